//! Game state and the turn coordinator
//!
//! [`Game`] is the read-only view handed to players: the board plus the
//! counters of the running game. [`Gomoku`] owns a `Game` and its players
//! and drives the turn protocol. It is the only writer of either.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::board::{Alignment, Board, Cell, Pos, Stone, PLAYER_COUNT};
use crate::error::{MoveError, UsageError};
use crate::player::{MoveKey, MoveSlot, Player, StateObserver};
use crate::rules::{self, PendingFive, WinEvent};

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a game instance. Forks get a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(u64);

impl GameId {
    fn fresh() -> Self {
        Self(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Counters of a game in progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub turn: u32,
    pub captures: [u32; PLAYER_COUNT],
    pub placed: [u32; PLAYER_COUNT],
    pub winner: Option<Stone>,
    pub pending: Option<PendingFive>,
    pub aborted: bool,
    pub last_move: Option<Pos>,
}

/// Board and state of one game
#[derive(Debug)]
pub struct Game {
    id: GameId,
    board: Board,
    state: GameState,
}

impl Game {
    pub fn new() -> Self {
        Self {
            id: GameId::fresh(),
            board: Board::new(),
            state: GameState::default(),
        }
    }

    /// Game set up from an arbitrary position with `to_move` to play.
    ///
    /// Placed-token counts are taken from the board; capture counts start at zero.
    pub fn with_board(board: Board, to_move: Stone) -> Self {
        let placed = Stone::ALL.map(|stone| board.count(stone));
        Self {
            id: GameId::fresh(),
            board,
            state: GameState {
                turn: to_move.index() as u32,
                placed,
                ..GameState::default()
            },
        }
    }

    /// Independent copy with its own identity
    pub fn fork(&self) -> Self {
        Self {
            id: GameId::fresh(),
            board: self.board.clone(),
            state: self.state.clone(),
        }
    }

    #[inline]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.board.get(x, y)
    }

    #[inline]
    pub fn adjacent_count(&self, x: i32, y: i32, alignment: Alignment) -> u8 {
        self.board.adjacent_count(x, y, alignment)
    }

    #[inline]
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    /// Colour whose move it is
    #[inline]
    pub fn current(&self) -> Stone {
        Stone::for_turn(self.state.turn)
    }

    #[inline]
    pub fn capture_count(&self, stone: Stone) -> u32 {
        self.state.captures[stone.index()]
    }

    #[inline]
    pub fn tokens_placed(&self, stone: Stone) -> u32 {
        self.state.placed[stone.index()]
    }

    #[inline]
    pub fn winner(&self) -> Option<Stone> {
        self.state.winner
    }

    #[inline]
    pub fn pending(&self) -> Option<PendingFive> {
        self.state.pending
    }

    #[inline]
    pub fn last_move(&self) -> Option<Pos> {
        self.state.last_move
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.state.aborted
    }

    /// Won or aborted
    #[inline]
    pub fn is_over(&self) -> bool {
        self.state.winner.is_some() || self.state.aborted
    }

    pub fn validate(&self, x: i32, y: i32, stone: Stone) -> Result<(), MoveError> {
        rules::validate(&self.board, x, y, stone)
    }

    pub fn count_captures(&self, x: i32, y: i32, stone: Stone) -> u32 {
        rules::count_captures(&self.board, x, y, stone)
    }

    pub fn would_capture(&self, target: Pos, x: i32, y: i32, stone: Stone) -> bool {
        rules::would_capture(&self.board, target, (x, y), stone)
    }

    pub fn is_captured(&self, x: i32, y: i32, stone: Stone) -> bool {
        rules::is_captured(&self.board, x, y, stone)
    }

    pub fn is_in_danger(&self, x: i32, y: i32, stone: Stone) -> bool {
        rules::is_in_danger(&self.board, x, y, stone)
    }

    pub fn creates_double_three(&self, x: i32, y: i32, stone: Stone) -> bool {
        rules::creates_double_three(&self.board, x, y, stone)
    }

    fn clear(&mut self) {
        self.board.clear();
        self.state = GameState::default();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe way to stop a running game before its next turn
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// What a single call to [`Gomoku::next`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A token was placed
    Played(Pos),
    /// The submitted move broke a rule; the same player moves again
    Rejected(MoveError),
    /// The player produced no move this attempt
    NoMove,
    /// The game was already won or aborted
    Finished,
}

pub type Players = [Box<dyn Player>; PLAYER_COUNT];

/// Turn coordinator
pub struct Gomoku {
    game: Game,
    players: Players,
    observer: Option<Box<dyn StateObserver>>,
    slot: MoveSlot,
    rng: StdRng,
    logs: Vec<String>,
    started: bool,
    abort: AbortHandle,
}

fn seat_players(players: Vec<Box<dyn Player>>) -> Result<Players, UsageError> {
    players
        .try_into()
        .map_err(|given: Vec<Box<dyn Player>>| UsageError::PlayerCount {
            required: PLAYER_COUNT,
            given: given.len(),
        })
}

impl Gomoku {
    /// Fresh game. Player order is seat order: the first player is Black.
    pub fn new(
        players: Vec<Box<dyn Player>>,
        observer: Option<Box<dyn StateObserver>>,
    ) -> Result<Self, UsageError> {
        Self::with_game(Game::new(), players, observer)
    }

    /// Continue from an existing position
    pub fn with_game(
        game: Game,
        players: Vec<Box<dyn Player>>,
        observer: Option<Box<dyn StateObserver>>,
    ) -> Result<Self, UsageError> {
        Ok(Self {
            game,
            players: seat_players(players)?,
            observer,
            slot: MoveSlot::new(),
            rng: StdRng::from_rng(&mut rand::rng()),
            logs: Vec::new(),
            started: false,
            abort: AbortHandle::default(),
        })
    }

    /// Copy of the current position driven by other participants.
    ///
    /// The copy has its own identity; nothing done to it reaches this game.
    pub fn clone_with_players(
        &self,
        players: Vec<Box<dyn Player>>,
        observer: Option<Box<dyn StateObserver>>,
    ) -> Result<Self, UsageError> {
        Self::with_game(self.game.fork(), players, observer)
    }

    /// Share `abort` with code created before the coordinator, such as players
    pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mailbox shared with the players of this game
    pub fn slot(&self) -> &MoveSlot {
        &self.slot
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn player_name(&self, stone: Stone) -> String {
        self.players[stone.index()].name(stone)
    }

    /// Play until someone wins or the game is aborted.
    pub fn run(&mut self) -> Result<Option<Stone>, UsageError> {
        while !self.game.is_over() {
            self.next()?;
        }
        Ok(self.game.winner())
    }

    /// Run one move attempt for the player whose turn it is.
    pub fn next(&mut self) -> Result<TurnOutcome, UsageError> {
        if !self.started {
            self.start_players()?;
        }
        if self.abort.is_aborted() {
            self.game.state.aborted = true;
        }
        if self.game.is_over() {
            return Ok(TurnOutcome::Finished);
        }

        let stone = self.game.current();
        let seat = stone.index();
        let key = MoveKey::new(self.rng.random());
        self.slot.arm(key);

        debug!(turn = self.game.turn(), %stone, "requesting move");
        if !self.players[seat].get_move(&self.game, stone, key, &self.slot) {
            self.slot.disarm();
            return Ok(TurnOutcome::NoMove);
        }
        let Some((x, y)) = self.slot.take() else {
            return Ok(TurnOutcome::NoMove);
        };

        if let Err(err) = self.game.validate(x, y, stone) {
            debug!(x, y, %stone, %err, "move rejected");
            self.players[seat].report(&self.game, &err.to_string());
            return Ok(TurnOutcome::Rejected(err));
        }

        let pos = self.apply_move(x, y, stone);
        Ok(TurnOutcome::Played(pos))
    }

    /// Detach every player, keeping the position.
    pub fn end(&mut self) {
        for player in self.players.iter_mut() {
            player.game_end(&self.game);
        }
        self.slot.disarm();
        self.started = false;
    }

    /// Clear the board and counters and detach every player.
    pub fn reset(&mut self) {
        self.end();
        self.game.clear();
        self.abort.clear();
        self.logs.clear();
    }

    /// Reset, then swap in new participants
    pub fn reset_with(
        &mut self,
        players: Vec<Box<dyn Player>>,
        observer: Option<Box<dyn StateObserver>>,
    ) -> Result<(), UsageError> {
        let players = seat_players(players)?;
        self.reset();
        self.players = players;
        self.observer = observer;
        Ok(())
    }

    fn start_players(&mut self) -> Result<(), UsageError> {
        for stone in Stone::ALL {
            if let Err(err) = self.players[stone.index()].game_start(&self.game, stone) {
                for player in self.players.iter_mut() {
                    player.game_end(&self.game);
                }
                return Err(err);
            }
        }
        self.started = true;
        Ok(())
    }

    /// Tell the observer and every player about a cell change
    fn broadcast_change(&mut self, x: i32, y: i32, value: Option<Stone>) {
        let Self {
            game,
            players,
            observer,
            ..
        } = self;
        if let Some(observer) = observer.as_mut() {
            observer.report_change(game, x, y, value);
        }
        for player in players.iter_mut() {
            player.inform_change(game, x, y, value);
        }
    }

    /// Place, capture, check for a win and advance. The move is already validated.
    fn apply_move(&mut self, x: i32, y: i32, stone: Stone) -> Pos {
        let seat = stone.index();
        let pos = Pos::new(x as u8, y as u8);
        let name = self.player_name(stone);

        self.game.board.place(x, y, stone);
        self.game.state.placed[seat] += 1;
        self.game.state.last_move = Some(pos);
        self.logs
            .push(format!("{name} placed a token at {x}, {y}."));
        self.broadcast_change(x, y, Some(stone));

        self.resolve_captures(pos, stone, &name);

        let captures = self.game.capture_count(stone);
        if rules::is_capture_win(captures) {
            info!(%stone, captures, "capture win");
            self.game.state.winner = Some(stone);
            self.logs
                .push(format!("{name} has captured {captures} times and won!"));
        } else {
            let mut events = Vec::new();
            let winner = rules::check_adjacent(
                &self.game.board,
                &mut self.game.state.pending,
                pos,
                &mut events,
            );
            self.game.state.winner = winner;
            self.log_win_events(&events);
        }

        match self.game.winner() {
            None => self.game.state.turn += 1,
            Some(winner) => {
                let Self { game, players, .. } = self;
                for player in players.iter_mut() {
                    player.inform_winner(game, winner);
                }
            }
        }

        if let Some(observer) = self.observer.as_mut() {
            observer.log_turn(&self.game, &self.logs);
        }
        self.logs.clear();
        pos
    }

    fn resolve_captures(&mut self, pos: Pos, stone: Stone, name: &str) {
        let (x, y) = pos.coords();
        let victim = stone.opponent();
        let victim_name = self.player_name(victim);

        for pair in rules::find_captures(&self.game.board, x, y, stone) {
            for taken in pair {
                let (tx, ty) = taken.coords();
                self.logs.push(format!(
                    "{name} captured {victim_name}'s token at {tx}, {ty}."
                ));
                let state = &mut self.game.state;
                state.placed[victim.index()] = state.placed[victim.index()].saturating_sub(1);

                if let Some(removed) = self.game.board.remove(tx, ty) {
                    if rules::win::release_if_anchor(&mut self.game.state.pending, taken, &removed)
                        .is_some()
                    {
                        self.logs
                            .push(format!("{victim_name} no longer has 5 tokens in a row!"));
                    }
                }
            }
            self.game.state.captures[stone.index()] += 1;
            debug!(%stone, captures = self.game.capture_count(stone), "pair captured");

            for taken in pair {
                let (tx, ty) = taken.coords();
                self.broadcast_change(tx, ty, None);
            }
        }
    }

    fn log_win_events(&mut self, events: &[WinEvent]) {
        for &event in events {
            match event {
                WinEvent::FiveFormed(owner) => {
                    info!(%owner, "five in a row pending");
                    let name = self.player_name(owner);
                    self.logs
                        .push(format!("{name} placed at least 5 tokens in a row!"));
                    self.logs.push(
                        "This move must be countered before the next turn or they will win!"
                            .to_string(),
                    );
                }
                WinEvent::FiveBroken(owner) => {
                    info!(%owner, "pending five broken");
                    let name = self.player_name(owner);
                    self.logs
                        .push(format!("{name} no longer has 5 tokens in a row!"));
                }
                WinEvent::Confirmed(owner) => {
                    info!(%owner, "five in a row confirmed");
                    let name = self.player_name(owner);
                    self.logs.push(format!("{name} has won!"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays a fixed list of moves in order
    struct Script {
        moves: VecDeque<(i32, i32)>,
        reports: Arc<Mutex<Vec<String>>>,
    }

    impl Script {
        fn new(moves: &[(i32, i32)]) -> Self {
            Self {
                moves: moves.iter().copied().collect(),
                reports: Arc::default(),
            }
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

    #[derive(Default)]
    struct Recorder {
        logs: Arc<Mutex<Vec<String>>>,
    }

    impl StateObserver for Recorder {
        fn report_change(&mut self, _game: &Game, _x: i32, _y: i32, _value: Option<Stone>) {}

        fn log_turn(&mut self, _game: &Game, logs: &[String]) {
            self.logs.lock().unwrap().extend_from_slice(logs);
        }
    }

    fn scripted(black: &[(i32, i32)], white: &[(i32, i32)]) -> Gomoku {
        Gomoku::new(
            vec![Box::new(Script::new(black)), Box::new(Script::new(white))],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_requires_two_players() {
        let err = Gomoku::new(vec![Box::new(Script::new(&[]))], None).err();
        assert_eq!(
            err,
            Some(UsageError::PlayerCount {
                required: 2,
                given: 1
            })
        );
    }

    #[test]
    fn test_turns_alternate() {
        let mut gomoku = scripted(&[(0, 0), (2, 0)], &[(10, 10)]);
        assert_eq!(gomoku.next().unwrap(), TurnOutcome::Played(Pos::new(0, 0)));
        assert_eq!(gomoku.game().current(), Stone::White);
        assert_eq!(gomoku.next().unwrap(), TurnOutcome::Played(Pos::new(10, 10)));
        assert_eq!(gomoku.game().turn(), 2);
        assert_eq!(gomoku.game().tokens_placed(Stone::Black), 1);
        assert_eq!(gomoku.game().get(10, 10), Cell::Stone(Stone::White));
    }

    #[test]
    fn test_rejected_move_does_not_advance() {
        let mut gomoku = scripted(&[(0, 0), (1, 1)], &[(0, 0), (5, 5)]);
        gomoku.next().unwrap();
        assert_eq!(
            gomoku.next().unwrap(),
            TurnOutcome::Rejected(MoveError::Occupied { x: 0, y: 0 })
        );
        assert_eq!(gomoku.game().turn(), 1);
        assert_eq!(gomoku.next().unwrap(), TurnOutcome::Played(Pos::new(5, 5)));
    }

    #[test]
    fn test_no_move_is_retried() {
        let mut gomoku = scripted(&[], &[]);
        assert_eq!(gomoku.next().unwrap(), TurnOutcome::NoMove);
        assert_eq!(gomoku.game().turn(), 0);
        assert!(gomoku.game().board().is_board_empty());
    }

    #[test]
    fn test_capture_updates_counters_and_logs() {
        let recorder = Recorder::default();
        let logs = recorder.logs.clone();
        let mut gomoku = Gomoku::new(
            vec![
                Box::new(Script::new(&[(3, 3), (18, 18), (6, 3)])),
                Box::new(Script::new(&[(4, 3), (5, 3)])),
            ],
            Some(Box::new(recorder)),
        )
        .unwrap();

        for _ in 0..5 {
            gomoku.next().unwrap();
        }
        let game = gomoku.game();
        assert_eq!(game.capture_count(Stone::Black), 1);
        assert_eq!(game.tokens_placed(Stone::White), 0);
        assert!(game.board().is_empty(4, 3));
        assert!(game.board().is_empty(5, 3));

        let logs = logs.lock().unwrap();
        assert!(logs.contains(&"Script 1 captured Script 2's token at 5, 3.".to_string()));
        assert!(logs.contains(&"Script 1 captured Script 2's token at 4, 3.".to_string()));
    }

    #[test]
    fn test_abort_stops_run() {
        let mut gomoku = scripted(&[(0, 0)], &[]);
        let handle = gomoku.abort_handle();
        handle.abort();
        assert_eq!(gomoku.run().unwrap(), None);
        assert!(gomoku.game().is_aborted());
        assert!(gomoku.game().board().is_board_empty());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut gomoku = scripted(&[(0, 0)], &[(1, 0)]);
        gomoku.next().unwrap();
        gomoku.next().unwrap();
        gomoku.reset();
        assert_eq!(gomoku.game().turn(), 0);
        assert!(gomoku.game().board().is_board_empty());
        assert_eq!(gomoku.game().tokens_placed(Stone::Black), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut gomoku = scripted(&[(0, 0)], &[]);
        gomoku.next().unwrap();

        let mut clone = gomoku
            .clone_with_players(
                vec![Box::new(Script::new(&[])), Box::new(Script::new(&[(7, 7)]))],
                None,
            )
            .unwrap();
        assert_ne!(clone.game().id(), gomoku.game().id());
        clone.next().unwrap();
        assert_eq!(clone.game().get(7, 7), Cell::Stone(Stone::White));
        assert_eq!(gomoku.game().get(7, 7), Cell::Empty);
        assert_eq!(gomoku.game().turn(), 1);
    }
}
