//! Text adapters: a board printer and a line-based human player

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::board::{Stone, BOARD_SIZE};
use crate::game::{AbortHandle, Game};
use crate::player::{MoveKey, MoveSlot, Player, StateObserver};

/// Prints the board after every turn, the last placement in brackets,
/// followed by the turn log.
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, game: &Game, logs: &[String]) -> io::Result<()> {
        let last = game.last_move();
        writeln!(self.out, "[Game State]")?;
        writeln!(self.out, "{}", "-".repeat(BOARD_SIZE * 3))?;
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let value = game.get(x as i32, y as i32).stone().map_or(0, Stone::number);
                if last.is_some_and(|p| p.x as usize == x && p.y as usize == y) {
                    write!(self.out, "[{value}]")?;
                } else {
                    write!(self.out, " {value} ")?;
                }
            }
            writeln!(self.out)?;
        }
        for line in logs {
            writeln!(self.out, "[REPORT] {line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> StateObserver for ConsoleReporter<W> {
    fn report_change(&mut self, _game: &Game, _x: i32, _y: i32, _value: Option<Stone>) {}

    fn log_turn(&mut self, game: &Game, logs: &[String]) {
        if let Err(err) = self.render(game, logs) {
            warn!(%err, "failed to print the board");
        }
    }
}

/// Parse "x y"
fn parse_move(line: &str) -> Option<(i32, i32)> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((x, y)),
    }
}

/// Human player typing moves as `x y` lines.
///
/// Prompts and refusals go to `out`. When the input runs dry the game is
/// aborted through the handle given to [`LinePlayer::with_abort`].
pub struct LinePlayer<R: BufRead + Send, W: Write + Send> {
    input: R,
    out: W,
    abort: Option<AbortHandle>,
}

impl<R: BufRead + Send, W: Write + Send> LinePlayer<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            abort: None,
        }
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    fn say(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(%err, "failed to write to player");
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> Player for LinePlayer<R, W> {
    fn name(&self, _stone: Stone) -> String {
        "User".to_string()
    }

    fn report(&mut self, _game: &Game, message: &str) {
        self.say(message);
    }

    fn get_move(&mut self, game: &Game, stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        self.say(&format!("{stone} to move, next move ('x y'):"));

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                warn!("input closed, aborting game");
                if let Some(abort) = &self.abort {
                    abort.abort();
                }
                return false;
            }
            Ok(_) => {}
        }

        match parse_move(&line) {
            Some((x, y)) => slot.submit(x, y, key),
            None => {
                self.report(game, &format!("Could not read a move from {:?}", line.trim()));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::game::{Gomoku, TurnOutcome};
    use crate::player::{FixedMove, NullPlayer};
    use std::io::Cursor;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("3 4\n"), Some((3, 4)));
        assert_eq!(parse_move("  -1   20 "), Some((-1, 20)));
        assert_eq!(parse_move("3"), None);
        assert_eq!(parse_move("3 4 5"), None);
        assert_eq!(parse_move("a b"), None);
    }

    #[test]
    fn test_line_player_submits() {
        let game = Game::new();
        let slot = MoveSlot::new();
        let key = MoveKey::new(5);
        slot.arm(key);

        let mut player = LinePlayer::new(Cursor::new("9 10\n"), Vec::new());
        assert!(player.get_move(&game, Stone::Black, key, &slot));
        assert_eq!(slot.take(), Some((9, 10)));
    }

    #[test]
    fn test_line_player_reports_garbage() {
        let game = Game::new();
        let slot = MoveSlot::new();
        let key = MoveKey::new(5);
        slot.arm(key);

        let mut player = LinePlayer::new(Cursor::new("nine ten\n"), Vec::new());
        assert!(!player.get_move(&game, Stone::Black, key, &slot));
        assert_eq!(slot.take(), None);
        let out = String::from_utf8(player.out).unwrap();
        assert!(out.contains("Could not read a move"));
    }

    #[test]
    fn test_line_player_aborts_on_eof() {
        let game = Game::new();
        let slot = MoveSlot::new();
        let abort = AbortHandle::default();
        let mut player = LinePlayer::new(Cursor::new(""), Vec::new()).with_abort(abort.clone());
        assert!(!player.get_move(&game, Stone::White, MoveKey::new(1), &slot));
        assert!(abort.is_aborted());
    }

    #[test]
    fn test_reporter_brackets_last_move() {
        let players: Vec<Box<dyn Player>> = vec![
            Box::new(FixedMove::new(Pos::new(1, 0))),
            Box::new(NullPlayer),
        ];
        let mut gomoku = Gomoku::new(players, None).unwrap();
        assert_eq!(gomoku.next().unwrap(), TurnOutcome::Played(Pos::new(1, 0)));

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.log_turn(gomoku.game(), &["hello".to_string()]);
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("[Game State]"));
        lines.next();
        assert!(lines.next().unwrap().starts_with(" 0 [1] 0 "));
        assert!(out.ends_with("[REPORT] hello\n"));
    }
}
