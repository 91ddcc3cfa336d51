//! AI engine: heuristic scan plus shallow clone-based lookahead
//!
//! Move selection follows this order:
//!
//! 1. **Heuristic scan**: score cells around every token (captures, runs,
//!    defence). Falls back to probing the board edges, then to a random
//!    legal cell.
//! 2. **Lookahead** (depth > 0): replay the best few candidates on forked
//!    games, each against a nested engine one level shallower, and keep the
//!    candidate whose simulated future looks best.
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Game, Stone};
//!
//! let mut engine = AIEngine::with_config(3, 0).with_seed(7);
//! let game = Game::new();
//!
//! let result = engine.choose_move(&game, Stone::Black);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::cmp::Reverse;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::board::{Pos, Stone, ADJACENT_TO_WIN};
use crate::error::UsageError;
use crate::eval::{Heuristic, ScanSource};
use crate::game::{Game, Gomoku, TurnOutcome};
use crate::player::{FixedMove, MoveKey, MoveSlot, Player, Seat};

/// Deepest lookahead accepted by [`AiConfig`]
pub const MAX_DEPTH: u8 = 4;

/// Search configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiConfig {
    /// Candidates replayed at each lookahead level
    pub branching: usize,
    /// Lookahead levels; 0 means heuristic only
    pub depth: u8,
}

impl AiConfig {
    /// Branching is at least 1; depth is capped at [`MAX_DEPTH`].
    pub fn new(branching: usize, depth: u8) -> Self {
        Self {
            branching: branching.max(1),
            depth: depth.min(MAX_DEPTH),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new(4, 1)
    }
}

/// Which stage produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Highest priority from the heuristic scan
    Heuristic,
    /// Chosen by comparing simulated futures
    Lookahead,
    /// Nothing scored; free cell on the board edge
    EdgeProbe,
    /// Nothing scored and the edges were full
    Random,
}

impl From<ScanSource> for SearchType {
    fn from(source: ScanSource) -> Self {
        match source {
            ScanSource::Tokens => SearchType::Heuristic,
            ScanSource::EdgeProbe => SearchType::EdgeProbe,
            ScanSource::Random => SearchType::Random,
        }
    }
}

/// Result of a move search with statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Move chosen, if any legal move exists
    pub best_move: Option<Pos>,
    /// Heuristic priority of the chosen move
    pub priority: i32,
    /// Stage that decided
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Simulated games played by this engine
    pub nodes: u64,
}

/// How a simulated game turned out for `me`. Field order is comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Outcome {
    won: bool,
    not_lost: bool,
    captures: u32,
    opponent_captures: Reverse<u32>,
}

impl Outcome {
    fn of(game: &Game, me: Stone) -> Self {
        Self {
            won: game.winner() == Some(me),
            not_lost: game.winner() != Some(me.opponent()),
            captures: game.capture_count(me),
            opponent_captures: Reverse(game.capture_count(me.opponent())),
        }
    }
}

/// Gomoku AI player.
///
/// Usable directly through [`AIEngine::choose_move`] or seated in a
/// [`Gomoku`] game as a [`Player`]. One engine plays one game at a time.
pub struct AIEngine {
    config: AiConfig,
    rng: StdRng,
    seat: Seat,
    stone: Stone,
    /// Opponent tokens seen completing a five since our last move
    futile: Vec<Pos>,
    last_result: Option<MoveResult>,
}

impl AIEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(AiConfig::default())
    }

    /// Create an AI engine with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `branching` - Candidates replayed per lookahead level
    /// * `depth` - Lookahead levels (0 = heuristic only)
    #[must_use]
    pub fn with_config(branching: usize, depth: u8) -> Self {
        Self::from_config(AiConfig::new(branching, depth))
    }

    #[must_use]
    pub fn from_config(config: AiConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_rng(&mut rand::rng()),
            seat: Seat::default(),
            stone: Stone::Black,
            futile: Vec::new(),
            last_result: None,
        }
    }

    /// Make tie-breaks and fallbacks reproducible
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> AiConfig {
        self.config
    }

    /// Statistics of the last move this engine submitted
    pub fn last_result(&self) -> Option<&MoveResult> {
        self.last_result.as_ref()
    }

    /// Pick a move for `me` in `game`.
    pub fn choose_move(&mut self, game: &Game, me: Stone) -> MoveResult {
        let start = Instant::now();
        let futile = std::mem::take(&mut self.futile);
        let scan = Heuristic::new(game, me, &mut self.rng).run(&futile);

        let mut result = MoveResult {
            best_move: scan.best,
            priority: scan.priority,
            search_type: scan.source.into(),
            time_ms: 0,
            nodes: 0,
        };

        if self.config.depth > 0 && self.config.branching > 1 && scan.candidates.len() > 1 {
            let mut nodes = 0;
            if let Some((pos, outcome)) =
                self.lookahead(game, me, &scan.candidates, self.config.depth, &mut nodes)
            {
                debug!(%pos, ?outcome, "lookahead choice");
                result.best_move = Some(pos);
                result.priority = scan
                    .candidates
                    .iter()
                    .find(|(p, _)| *p == pos)
                    .map_or(0, |&(_, priority)| priority);
                result.search_type = SearchType::Lookahead;
            }
            result.nodes = nodes;
        }

        result.time_ms = start.elapsed().as_millis() as u64;
        debug!(
            %me,
            best = ?result.best_move,
            priority = result.priority,
            search = ?result.search_type,
            nodes = result.nodes,
            time_ms = result.time_ms,
            "move chosen"
        );
        result
    }

    /// Best of the top `branching` candidates by simulated outcome.
    /// Ties keep the earlier, higher-priority candidate.
    fn lookahead(
        &mut self,
        game: &Game,
        me: Stone,
        candidates: &[(Pos, i32)],
        depth: u8,
        nodes: &mut u64,
    ) -> Option<(Pos, Outcome)> {
        let mut best: Option<(Pos, Outcome)> = None;
        for &(pos, _) in candidates.iter().take(self.config.branching) {
            let Some(outcome) = self.simulate(game, me, pos, depth, nodes) else {
                continue;
            };
            if best.map_or(true, |(_, current)| outcome > current) {
                best = Some((pos, outcome));
            }
        }
        best
    }

    /// Play `candidate` and the opponent's reply on a fork of `game`.
    ///
    /// Returns `None` when the candidate turns out to be illegal.
    fn simulate(
        &mut self,
        game: &Game,
        me: Stone,
        candidate: Pos,
        depth: u8,
        nodes: &mut u64,
    ) -> Option<Outcome> {
        let reply = AIEngine {
            config: AiConfig::new(self.config.branching, depth - 1),
            rng: StdRng::from_rng(&mut self.rng),
            seat: Seat::default(),
            stone: me.opponent(),
            futile: Vec::new(),
            last_result: None,
        };
        let mover: Box<dyn Player> = Box::new(FixedMove::new(candidate));
        let reply: Box<dyn Player> = Box::new(reply);
        let players = match me {
            Stone::Black => vec![mover, reply],
            Stone::White => vec![reply, mover],
        };

        let mut fork = Gomoku::with_game(game.fork(), players, None).ok()?;
        *nodes += 1;

        let outcome = match fork.next() {
            Ok(TurnOutcome::Played(_)) => {
                if !fork.game().is_over() {
                    if let Err(err) = fork.next() {
                        warn!(%err, "simulated reply failed");
                    }
                }
                Some(self.settle(fork.game(), me, depth, nodes))
            }
            _ => None,
        };
        fork.end();
        outcome
    }

    /// Outcome of a simulated position, searching deeper while depth remains.
    fn settle(&mut self, game: &Game, me: Stone, depth: u8, nodes: &mut u64) -> Outcome {
        let here = Outcome::of(game, me);
        if depth <= 1 || game.is_over() || game.current() != me {
            return here;
        }
        let anchor = futile_anchor(game, me);
        let scan = Heuristic::new(game, me, &mut self.rng).run(anchor.as_slice());
        self.lookahead(game, me, &scan.candidates, depth - 1, nodes)
            .map_or(here, |(_, outcome)| outcome)
    }
}

/// Anchor of a five the opponent has pending against `me`
fn futile_anchor(game: &Game, me: Stone) -> Option<Pos> {
    game.pending().filter(|p| p.owner != me).map(|p| p.pos)
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for AIEngine {
    fn name(&self, _stone: Stone) -> String {
        "AI".to_string()
    }

    fn report(&mut self, _game: &Game, message: &str) {
        warn!(message, "AI move refused");
    }

    fn inform_change(&mut self, game: &Game, x: i32, y: i32, value: Option<Stone>) {
        if !self.seat.is_in(game) {
            return;
        }
        let Some(stone) = value.filter(|&s| s != self.stone) else {
            return;
        };
        let completes_five = game
            .board()
            .token(x, y)
            .is_some_and(|t| t.owner() == stone && t.longest_run() >= ADJACENT_TO_WIN);
        if let Some(pos) = Pos::checked(x, y).filter(|_| completes_five) {
            debug!(%pos, "opponent five, looking for a counter-capture");
            self.futile.push(pos);
        }
    }

    fn get_move(&mut self, game: &Game, stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        if !self.seat.is_in(game) {
            return false;
        }
        let result = self.choose_move(game, stone);
        let submitted = result
            .best_move
            .is_some_and(|pos| slot.submit(pos.x as i32, pos.y as i32, key));
        self.last_result = Some(result);
        submitted
    }

    fn game_start(&mut self, game: &Game, stone: Stone) -> Result<(), UsageError> {
        self.seat.join(game, self.name(stone))?;
        self.stone = stone;
        self.futile.clear();
        Ok(())
    }

    fn game_end(&mut self, game: &Game) {
        if self.seat.leave(game) {
            self.futile.clear();
        }
    }
}
