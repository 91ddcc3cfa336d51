//! Gomoku engine with Ninuki-renju capture rules
//!
//! A Gomoku engine, turn coordinator and AI implementing the capture variant:
//! - Standard 19x19 board
//! - 5-in-a-row wins, but only if it survives the opponent's next move
//! - Capture win: 10 captured pairs
//! - Pair capture rule: X-O-O-X pattern captures the O-O pair
//! - No placing into a capture, no double free-three unless it captures
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//! - [`board`]: Token store with incremental run counters
//! - [`rules`]: Game rules (capture, win, forbidden moves)
//! - [`game`]: Game state and the turn coordinator
//! - [`player`]: Player and observer traits, move submission slot
//! - [`eval`]: Heuristic move scan
//! - [`engine`]: AI player built on the scan plus lookahead
//! - [`console`]: Text board printer and line-based human player
//! - [`ui`]: egui window acting as observer and human player
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{AIEngine, Gomoku, Player, RandomPlayer, TurnOutcome};
//!
//! let players: Vec<Box<dyn Player>> = vec![
//!     Box::new(AIEngine::with_config(2, 0).with_seed(1)),
//!     Box::new(RandomPlayer::with_seed(2)),
//! ];
//! let mut gomoku = Gomoku::new(players, None).unwrap();
//!
//! // Play a few turns
//! for _ in 0..6 {
//!     if gomoku.next().unwrap() == TurnOutcome::Finished {
//!         break;
//!     }
//! }
//! println!("Turn {}", gomoku.game().turn());
//! ```

pub mod board;
pub mod console;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod player;
pub mod rules;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, BOARD_SIZE, CAPTURES_TO_WIN};
pub use console::{ConsoleReporter, LinePlayer};
pub use engine::{AIEngine, AiConfig, MoveResult, SearchType};
pub use error::{MoveError, UsageError};
pub use game::{AbortHandle, Game, Gomoku, TurnOutcome};
pub use player::{FixedMove, MoveKey, MoveSlot, NullPlayer, Player, RandomPlayer, StateObserver};
pub use ui::Visualizer;
