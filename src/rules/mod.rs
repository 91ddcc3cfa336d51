//! Game rules for Gomoku with Ninuki-renju variant
//!
//! This module implements the rule set for Gomoku including:
//! - Capture rules (pair capture, no moving into a capture)
//! - Win conditions (pending five, capture win)
//! - Forbidden moves (double-three)

pub mod capture;
pub mod forbidden;
pub mod win;

use crate::board::{Board, Cell, Stone};
use crate::error::MoveError;

// Re-exports for convenient access
pub use capture::{
    count_captures, find_captures, has_capture, is_captured, is_in_danger, would_capture,
};
pub use forbidden::{count_free_threes, creates_double_three, creates_free_three};
pub use win::{check_adjacent, five_line_at, is_capture_win, PendingFive, WinEvent};

/// Check whether `owner` may place at (x, y).
///
/// Checks run in a fixed order and the first failure wins: bounds,
/// occupancy, moving into a capture, then double-three. A double-three is
/// allowed when the placement captures at least one pair.
pub fn validate(board: &Board, x: i32, y: i32, owner: Stone) -> Result<(), MoveError> {
    match board.get(x, y) {
        Cell::OutOfBounds => return Err(MoveError::OutOfBounds { x, y }),
        Cell::Stone(_) => return Err(MoveError::Occupied { x, y }),
        Cell::Empty => {}
    }

    if is_captured(board, x, y, owner) {
        return Err(MoveError::WouldBeCaptured);
    }

    if creates_double_three(board, x, y, owner) && !has_capture(board, x, y, owner) {
        return Err(MoveError::DoubleThree);
    }

    Ok(())
}

/// Shorthand for `validate(..).is_ok()`
#[inline]
pub fn is_legal(board: &Board, x: i32, y: i32, owner: Stone) -> bool {
    validate(board, x, y, owner).is_ok()
}
