//! Forbidden move detection (double-three rule)
//!
//! A free three is a line of exactly three own stones, allowing a single
//! empty gap, that is closed by an empty cell on both ends. Placing a stone
//! that creates two or more free threes at once is forbidden unless the
//! placement also captures.
//!
//! Examples of free-three patterns (X = own stone, _ = empty):
//!   _XXX_   (consecutive)
//!   _XX_X_  (split)
//!   _X_XX_  (split)

use crate::board::{Alignment, Board, Cell, Stone};

use super::capture::is_in_danger;

/// Cells that end a scan: board edge, opponent stones, and own stones that
/// could be captured next ply.
#[inline]
fn is_blocker(board: &Board, x: i32, y: i32, owner: Stone) -> bool {
    match board.get(x, y) {
        Cell::OutOfBounds => true,
        Cell::Empty => false,
        Cell::Stone(stone) if stone != owner => true,
        Cell::Stone(_) => is_in_danger(board, x, y, owner),
    }
}

/// Result of walking one side of the placement
enum SideScan {
    /// Hit a blocker before finding any empty cell
    Blocked,
    /// Own stones counted on this side and whether the gap was spent
    Open { stones: i32, used_gap: bool },
}

/// Walk away from (x, y) in direction (dx, dy).
///
/// The first empty cell may be stepped over when `gap_available`; a later
/// empty cell closes the side. Stones past the gap only count if the side
/// is closed by an empty cell rather than a blocker, and the gap is only
/// spent when such stones were counted.
fn scan_side(
    board: &Board,
    x: i32,
    y: i32,
    owner: Stone,
    (dx, dy): (i32, i32),
    gap_available: bool,
) -> SideScan {
    let mut spaced = false;
    let mut count = 0;
    let mut stones = 0;
    let mut before_gap = 0;

    for i in 1.. {
        let (cx, cy) = (x + dx * i, y + dy * i);
        if is_blocker(board, cx, cy, owner) {
            if !spaced {
                return SideScan::Blocked;
            }
            break;
        }
        if board.get(cx, cy).is_empty() {
            if !spaced && gap_available {
                spaced = true;
                stones = count;
                before_gap = count;
                continue;
            }
            stones = count;
            break;
        }
        count += 1;
    }

    SideScan::Open {
        stones,
        used_gap: spaced && stones > before_gap,
    }
}

/// Would placing `owner` at (x, y) create a free three along `alignment`?
pub fn creates_free_three(board: &Board, x: i32, y: i32, owner: Stone, alignment: Alignment) -> bool {
    let (dx, dy) = alignment.delta();

    let (prev, gap_spent) = match scan_side(board, x, y, owner, (-dx, -dy), true) {
        SideScan::Blocked => return false,
        SideScan::Open { stones, used_gap } => (stones, used_gap),
    };
    let next = match scan_side(board, x, y, owner, (dx, dy), !gap_spent) {
        SideScan::Blocked => return false,
        SideScan::Open { stones, .. } => stones,
    };

    prev + 1 + next == 3
}

/// Count the number of free threes created by placing a stone.
pub fn count_free_threes(board: &Board, x: i32, y: i32, owner: Stone) -> u8 {
    Alignment::ALL
        .iter()
        .filter(|&&alignment| creates_free_three(board, x, y, owner, alignment))
        .count() as u8
}

/// Check if placing a stone creates a double-three.
///
/// Captures are not considered here; `rules::validate` lets a capturing
/// double-three through.
#[inline]
pub fn creates_double_three(board: &Board, x: i32, y: i32, owner: Stone) -> bool {
    count_free_threes(board, x, y, owner) >= 2
}
