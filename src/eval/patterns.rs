//! Priority weights for move selection
//!
//! These constants define how much a candidate placement is worth to the
//! heuristic scan. Run weights are multiplied by the length of the run the
//! placement would extend or block, so they grow with the threat.

use crate::board::{ADJACENT_TO_WIN, CAPTURES_TO_WIN};

/// Priority weights
pub struct Priority;

impl Priority {
    /// Per pair captured by the placement
    pub const CAPTURE: i32 = 40;
    /// Per token of a run the placement extends or blocks
    pub const ADJACENT: i32 = 20;
    /// Per token of a run, when the placement shields one of our endangered tokens
    pub const DEFENSE: i32 = 50;
    /// Near the win threshold: a run of three or more with room for five,
    /// or a capture that puts a capture win within reach
    pub const LAST_DITCH: i32 = 200;
    /// A five is already on the board; only breaking or completing it matters
    pub const FUTILE: i32 = 1000;
}

/// Weight for a placement that would make a run of `adjacent` tokens in a
/// line with room for `capacity`.
///
/// `defending` marks placements next to one of our own tokens that is in
/// capture danger.
#[inline]
pub fn run_priority(adjacent: i32, capacity: i32, defending: bool) -> i32 {
    let win = ADJACENT_TO_WIN as i32;
    if capacity >= win && adjacent >= win {
        adjacent * Priority::FUTILE
    } else if capacity >= win && adjacent >= win - 2 {
        adjacent * Priority::LAST_DITCH
    } else if defending {
        adjacent * Priority::DEFENSE
    } else {
        adjacent * Priority::ADJACENT
    }
}

/// Bonus for capturing `pairs` pairs when `held` pairs are already captured.
///
/// Captures that bring the total within two of the threshold are worth far more.
#[inline]
pub fn capture_priority(pairs: u32, held: u32) -> i32 {
    if pairs == 0 {
        return 0;
    }
    let mut priority = pairs as i32 * Priority::CAPTURE;
    if held + pairs >= CAPTURES_TO_WIN - 2 {
        priority += pairs as i32 * Priority::LAST_DITCH;
    }
    priority
}
