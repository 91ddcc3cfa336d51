//! Player and observer abstractions
//!
//! The coordinator talks to every participant through [`Player`]. Moves are
//! not returned from `get_move`; they are posted to a [`MoveSlot`] together
//! with the [`MoveKey`] minted for the current attempt. That lets a player
//! answer synchronously from inside `get_move` or later from another thread
//! (a GUI event loop, for instance).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Pos, Stone, BOARD_SIZE};
use crate::error::UsageError;
use crate::game::{Game, GameId};
use crate::rules;

/// Single-use capability for one move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveKey(u64);

impl MoveKey {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Default)]
struct SlotState {
    armed: Option<MoveKey>,
    submitted: Option<(i32, i32)>,
}

/// Key-guarded single-entry mailbox for move submissions.
///
/// Clones share the same slot, so a clone can be handed to another thread.
#[derive(Debug, Clone, Default)]
pub struct MoveSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl MoveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Post a move for the attempt identified by `key`.
    ///
    /// Returns false (and changes nothing) when the key is not the armed one
    /// or a move was already posted with it.
    pub fn submit(&self, x: i32, y: i32, key: MoveKey) -> bool {
        let mut slot = self.lock();
        if slot.armed != Some(key) || slot.submitted.is_some() {
            return false;
        }
        slot.submitted = Some((x, y));
        true
    }

    /// Open the slot for a new attempt, dropping anything left from the last one
    pub(crate) fn arm(&self, key: MoveKey) {
        let mut slot = self.lock();
        slot.armed = Some(key);
        slot.submitted = None;
    }

    pub(crate) fn disarm(&self) {
        let mut slot = self.lock();
        slot.armed = None;
        slot.submitted = None;
    }

    /// Consume the posted move and close the slot
    pub(crate) fn take(&self) -> Option<(i32, i32)> {
        let mut slot = self.lock();
        slot.armed = None;
        slot.submitted.take()
    }
}

/// A participant in a game: human front-end, AI, or stand-in.
///
/// All callbacks receive a read-only view of the game; only the coordinator
/// mutates it.
pub trait Player: Send {
    /// Display name used in turn logs
    fn name(&self, stone: Stone) -> String;

    /// A move from this player was refused
    fn report(&mut self, _game: &Game, _message: &str) {}

    /// A cell changed. `value` is `None` when a token was removed.
    fn inform_change(&mut self, _game: &Game, _x: i32, _y: i32, _value: Option<Stone>) {}

    fn inform_winner(&mut self, _game: &Game, _winner: Stone) {}

    /// Asked for a move. Post it to `slot` with `key`, then return true; or
    /// return false to be asked again.
    fn get_move(&mut self, game: &Game, stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool;

    fn game_start(&mut self, _game: &Game, _stone: Stone) -> Result<(), UsageError> {
        Ok(())
    }

    fn game_end(&mut self, _game: &Game) {}
}

/// Receives every board change and the per-turn log
pub trait StateObserver: Send {
    fn report_change(&mut self, game: &Game, x: i32, y: i32, value: Option<Stone>);

    fn log_turn(&mut self, game: &Game, logs: &[String]);
}

/// Tracks which game a stateful player is attached to
#[derive(Debug, Default, Clone, Copy)]
pub struct Seat {
    game: Option<GameId>,
}

impl Seat {
    pub fn join(&mut self, game: &Game, name: impl Into<String>) -> Result<(), UsageError> {
        if self.game.is_some() {
            return Err(UsageError::AlreadyInGame { name: name.into() });
        }
        self.game = Some(game.id());
        Ok(())
    }

    /// Leave `game`; a call for some other game is ignored
    pub fn leave(&mut self, game: &Game) -> bool {
        if self.is_in(game) {
            self.game = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_in(&self, game: &Game) -> bool {
        self.game == Some(game.id())
    }
}

/// Seat filler that never moves
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlayer;

impl Player for NullPlayer {
    fn name(&self, _stone: Stone) -> String {
        "(null)".to_string()
    }

    fn get_move(&mut self, _game: &Game, _stone: Stone, _key: MoveKey, _slot: &MoveSlot) -> bool {
        false
    }
}

/// Plays one predetermined move, then yields forever.
///
/// Used as the mover's stand-in inside lookahead simulations.
#[derive(Debug, Clone, Copy)]
pub struct FixedMove {
    target: Option<Pos>,
    rejected: bool,
}

impl FixedMove {
    pub fn new(target: Pos) -> Self {
        Self {
            target: Some(target),
            rejected: false,
        }
    }

    /// The move was refused by the rules
    pub fn was_rejected(&self) -> bool {
        self.rejected
    }
}

impl Player for FixedMove {
    fn name(&self, _stone: Stone) -> String {
        "FixedMove".to_string()
    }

    fn report(&mut self, _game: &Game, _message: &str) {
        self.rejected = true;
    }

    fn get_move(&mut self, _game: &Game, _stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        match self.target.take() {
            Some(pos) => slot.submit(pos.x as i32, pos.y as i32, key),
            None => false,
        }
    }
}

/// Plays a uniformly random legal cell
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn name(&self, _stone: Stone) -> String {
        "Random".to_string()
    }

    fn get_move(&mut self, game: &Game, stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        let legal: Vec<Pos> = (0..BOARD_SIZE * BOARD_SIZE)
            .map(Pos::from_index)
            .filter(|p| rules::is_legal(game.board(), p.x as i32, p.y as i32, stone))
            .collect();
        if legal.is_empty() {
            return false;
        }
        let pos = legal[self.rng.random_range(0..legal.len())];
        slot.submit(pos.x as i32, pos.y as i32, key)
    }
}
