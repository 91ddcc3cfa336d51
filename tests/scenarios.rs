//! Whole-game scenarios driven through the public API

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gomoku::{
    AIEngine, Game, Gomoku, MoveError, MoveKey, MoveSlot, Player, Pos, RandomPlayer,
    StateObserver, Stone, TurnOutcome, UsageError,
};

/// Plays a fixed list of moves
struct Script {
    moves: VecDeque<(i32, i32)>,
    reports: Arc<Mutex<Vec<String>>>,
}

impl Script {
    fn new(moves: &[(i32, i32)]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let script = Self {
            moves: moves.iter().copied().collect(),
            reports: Arc::clone(&reports),
        };
        (script, reports)
    }
}

impl Player for Script {
    fn name(&self, stone: Stone) -> String {
        format!("Script {}", stone.number())
    }

    fn report(&mut self, _game: &Game, message: &str) {
        self.reports.lock().unwrap().push(message.to_string());
    }

    fn get_move(&mut self, _game: &Game, _stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        match self.moves.pop_front() {
            Some((x, y)) => slot.submit(x, y, key),
            None => false,
        }
    }
}

#[derive(Clone, Default)]
struct Recorder {
    logs: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.logs.lock().unwrap())
    }
}

impl StateObserver for Recorder {
    fn report_change(&mut self, _game: &Game, _x: i32, _y: i32, _value: Option<Stone>) {}

    fn log_turn(&mut self, _game: &Game, logs: &[String]) {
        self.logs.lock().unwrap().extend_from_slice(logs);
    }
}

struct Match {
    gomoku: Gomoku,
    log: Recorder,
    black_reports: Arc<Mutex<Vec<String>>>,
    white_reports: Arc<Mutex<Vec<String>>>,
}

fn scripted(black: &[(i32, i32)], white: &[(i32, i32)]) -> Match {
    let (black, black_reports) = Script::new(black);
    let (white, white_reports) = Script::new(white);
    let log = Recorder::default();
    let players: Vec<Box<dyn Player>> = vec![Box::new(black), Box::new(white)];
    let gomoku = Gomoku::new(players, Some(Box::new(log.clone()))).unwrap();
    Match {
        gomoku,
        log,
        black_reports,
        white_reports,
    }
}

/// Advance `n` placements, failing on anything else
fn play(gomoku: &mut Gomoku, n: usize) {
    for _ in 0..n {
        match gomoku.next().unwrap() {
            TurnOutcome::Played(_) => {}
            other => panic!("expected a placement, got {other:?}"),
        }
    }
}

fn column_five_setup() -> (Vec<(i32, i32)>, Vec<(i32, i32)>) {
    // Black builds (9,9)..(9,13); (9,11) is paired with (10,11) and flanked by White at (8,11)
    let black = vec![(9, 9), (9, 10), (10, 11), (9, 11), (9, 12), (9, 13)];
    let white = vec![(0, 0), (0, 2), (8, 11), (0, 4), (0, 6)];
    (black, white)
}

#[test]
fn pending_five_broken_by_counter_capture() {
    let (black, mut white) = column_five_setup();
    white.push((11, 11));
    let mut m = scripted(&black, &white);

    play(&mut m.gomoku, 11);
    let game = m.gomoku.game();
    assert!(game.pending().is_some());
    assert_eq!(game.winner(), None);
    let logs = m.log.take();
    assert!(logs.contains(&"Script 1 placed at least 5 tokens in a row!".to_string()));
    assert!(logs.contains(
        &"This move must be countered before the next turn or they will win!".to_string()
    ));

    // White captures (10,11) and (9,11), cutting the column
    play(&mut m.gomoku, 1);
    let game = m.gomoku.game();
    assert_eq!(game.winner(), None);
    assert!(game.pending().is_none());
    assert_eq!(game.capture_count(Stone::White), 1);
    assert_eq!(game.get(9, 11).stone(), None);
    assert_eq!(game.get(10, 11).stone(), None);
    assert_eq!(game.tokens_placed(Stone::Black), 4);
    assert_eq!(game.current(), Stone::Black);

    let logs = m.log.take();
    assert_eq!(
        logs,
        vec![
            "Script 2 placed a token at 11, 11.".to_string(),
            "Script 2 captured Script 1's token at 10, 11.".to_string(),
            "Script 2 captured Script 1's token at 9, 11.".to_string(),
            "Script 1 no longer has 5 tokens in a row!".to_string(),
        ]
    );
}

#[test]
fn pending_five_confirmed_when_not_countered() {
    let (black, mut white) = column_five_setup();
    white.push((0, 8));
    let mut m = scripted(&black, &white);

    play(&mut m.gomoku, 11);
    assert_eq!(m.gomoku.game().winner(), None);
    play(&mut m.gomoku, 1);

    let game = m.gomoku.game();
    assert_eq!(game.winner(), Some(Stone::Black));
    assert!(game.is_over());
    assert!(m.log.take().contains(&"Script 1 has won!".to_string()));
    assert_eq!(m.gomoku.next().unwrap(), TurnOutcome::Finished);
}

#[test]
fn tenth_capture_wins_immediately() {
    // Ten rows; in each Black flanks at x=0, White pairs at x=1,2, Black takes at x=3
    let rows: Vec<i32> = (0..10).map(|k| k * 2).collect();
    let mut black = vec![(0, rows[0])];
    let mut white = vec![(1, rows[0])];
    for (k, &y) in rows.iter().enumerate() {
        match rows.get(k + 1) {
            Some(&next) => black.push((0, next)),
            None => black.push((6, 0)),
        }
        white.push((2, y));
        black.push((3, y));
        if let Some(&next) = rows.get(k + 1) {
            white.push((1, next));
        }
    }

    let mut m = scripted(&black, &white);
    let winner = m.gomoku.run().unwrap();
    let game = m.gomoku.game();
    assert_eq!(winner, Some(Stone::Black));
    assert_eq!(game.capture_count(Stone::Black), 10);
    assert_eq!(game.tokens_placed(Stone::White), 0);
    assert!(m
        .log
        .take()
        .contains(&"Script 1 has captured 10 times and won!".to_string()));
}

#[test]
fn tenth_capture_wins_over_pending_five() {
    // Nine capture rows as above, then White completes a five in column 15
    // before Black takes the tenth pair at (3,18)
    let rows: Vec<i32> = (0..10).map(|k| k * 2).collect();
    let mut black = vec![(0, rows[0])];
    let mut white = vec![(1, rows[0])];
    for k in 0..9 {
        let y = rows[k];
        black.push((0, rows[k + 1]));
        white.push((2, y));
        black.push((3, y));
        white.push((1, rows[k + 1]));
    }
    black.extend((0..6).map(|i| (6, i * 2)));
    black.push((3, 18));
    white.push((2, 18));
    white.extend((4..=8).map(|y| (15, y)));

    let mut m = scripted(&black, &white);
    play(&mut m.gomoku, black.len() - 1 + white.len());
    let game = m.gomoku.game();
    assert_eq!(game.capture_count(Stone::Black), 9);
    assert_eq!(game.winner(), None);
    let pending = game.pending().expect("white five pending");
    assert_eq!(pending.owner, Stone::White);
    assert_eq!(pending.pos, Pos::new(15, 8));

    assert_eq!(
        m.gomoku.next().unwrap(),
        TurnOutcome::Played(Pos::new(3, 18))
    );
    let game = m.gomoku.game();
    assert_eq!(game.capture_count(Stone::Black), 10);
    assert_eq!(game.winner(), Some(Stone::Black));
    let logs = m.log.take();
    assert!(logs.contains(&"Script 1 has captured 10 times and won!".to_string()));
    assert!(!logs.contains(&"Script 2 has won!".to_string()));
    assert_eq!(m.gomoku.next().unwrap(), TurnOutcome::Finished);
}

#[test]
fn placing_into_capture_is_refused() {
    let mut m = scripted(&[(5, 5), (8, 5), (0, 0)], &[(6, 5), (7, 5), (0, 18)]);
    play(&mut m.gomoku, 3);

    let before = m.gomoku.game().board().stone_count();
    assert_eq!(
        m.gomoku.next().unwrap(),
        TurnOutcome::Rejected(MoveError::WouldBeCaptured)
    );
    assert_eq!(m.gomoku.game().board().stone_count(), before);
    assert_eq!(m.gomoku.game().current(), Stone::White);
    assert_eq!(
        *m.white_reports.lock().unwrap(),
        vec!["You may not place a token into a capture!".to_string()]
    );

    // Same player tries again
    assert_eq!(
        m.gomoku.next().unwrap(),
        TurnOutcome::Played(Pos::new(0, 18))
    );
}

#[test]
fn double_three_refused_without_capture() {
    let black = [(10, 9), (11, 9), (9, 10), (9, 11), (9, 9)];
    let white = [(0, 0), (0, 2), (0, 4), (0, 6)];
    let mut m = scripted(&black, &white);
    play(&mut m.gomoku, 8);

    assert_eq!(
        m.gomoku.next().unwrap(),
        TurnOutcome::Rejected(MoveError::DoubleThree)
    );
    assert!(m.gomoku.game().get(9, 9).is_empty());
    assert_eq!(
        *m.black_reports.lock().unwrap(),
        vec!["You may not play a token that would cause a double three!".to_string()]
    );
}

#[test]
fn double_three_allowed_when_it_captures() {
    let black = [(6, 6), (10, 9), (11, 9), (9, 10), (9, 11), (9, 9)];
    let white = [(8, 8), (7, 7), (0, 0), (0, 2), (0, 4)];
    let mut m = scripted(&black, &white);
    play(&mut m.gomoku, 10);

    assert_eq!(
        m.gomoku.next().unwrap(),
        TurnOutcome::Played(Pos::new(9, 9))
    );
    let game = m.gomoku.game();
    assert_eq!(game.capture_count(Stone::Black), 1);
    assert!(game.get(8, 8).is_empty());
    assert!(game.get(7, 7).is_empty());
    assert!(m.black_reports.lock().unwrap().is_empty());
}

/// Claims a move without ever submitting one
struct Liar;

impl Player for Liar {
    fn name(&self, _stone: Stone) -> String {
        "Liar".to_string()
    }

    fn get_move(&mut self, _game: &Game, _stone: Stone, _key: MoveKey, _slot: &MoveSlot) -> bool {
        true
    }
}

/// Submits with the key of an earlier attempt
#[derive(Default)]
struct Stale {
    old: Option<MoveKey>,
}

impl Player for Stale {
    fn name(&self, _stone: Stone) -> String {
        "Stale".to_string()
    }

    fn get_move(&mut self, _game: &Game, _stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        match self.old.replace(key) {
            None => false,
            Some(old) => slot.submit(9, 9, old),
        }
    }
}

#[test]
fn get_move_without_submission_changes_nothing() {
    let players: Vec<Box<dyn Player>> = vec![Box::new(Liar), Box::new(RandomPlayer::with_seed(1))];
    let mut gomoku = Gomoku::new(players, None).unwrap();
    for _ in 0..5 {
        assert_eq!(gomoku.next().unwrap(), TurnOutcome::NoMove);
    }
    assert!(gomoku.game().board().is_board_empty());
    assert_eq!(gomoku.game().turn(), 0);
}

#[test]
fn stale_key_is_ignored() {
    let players: Vec<Box<dyn Player>> =
        vec![Box::new(Stale::default()), Box::new(RandomPlayer::with_seed(1))];
    let mut gomoku = Gomoku::new(players, None).unwrap();
    assert_eq!(gomoku.next().unwrap(), TurnOutcome::NoMove);
    assert_eq!(gomoku.next().unwrap(), TurnOutcome::NoMove);
    assert!(gomoku.game().board().is_board_empty());
    assert_eq!(gomoku.game().current(), Stone::Black);
}

#[test]
fn one_player_is_not_a_game() {
    let players: Vec<Box<dyn Player>> = vec![Box::new(Liar)];
    assert!(matches!(
        Gomoku::new(players, None),
        Err(UsageError::PlayerCount { required: 2, given: 1 })
    ));
}

#[test]
fn ai_against_random_keeps_counts_consistent() {
    let players: Vec<Box<dyn Player>> = vec![
        Box::new(AIEngine::with_config(3, 1).with_seed(17)),
        Box::new(RandomPlayer::with_seed(23)),
    ];
    let mut gomoku = Gomoku::new(players, None).unwrap();

    for _ in 0..120 {
        if gomoku.next().unwrap() == TurnOutcome::Finished {
            break;
        }
        let game = gomoku.game();
        for stone in Stone::ALL {
            assert_eq!(game.tokens_placed(stone), game.board().count(stone));
        }
    }

    gomoku.reset();
    assert!(gomoku.game().board().is_board_empty());
    assert_eq!(gomoku.game().turn(), 0);
    assert_eq!(gomoku.game().winner(), None);
}

#[test]
fn ai_cannot_join_two_games() {
    let mut engine = AIEngine::with_config(2, 0);
    let first = Game::new();
    let fork = first.fork();
    engine.game_start(&first, Stone::Black).unwrap();
    assert!(matches!(
        engine.game_start(&fork, Stone::White),
        Err(UsageError::AlreadyInGame { .. })
    ));

    engine.game_end(&fork);
    assert!(engine.game_start(&fork, Stone::White).is_err());
    engine.game_end(&first);
    assert!(engine.game_start(&fork, Stone::White).is_ok());
}
