//! Win condition checking for Ninuki-renju (Pente-style Gomoku)
//!
//! Win conditions:
//! 1. Five or more stones in a row, still standing one ply later
//! 2. Capture 10 pairs
//!
//! Endgame capture rule: a fresh five is only pending. The opponent gets one
//! placement to break it by capture; the run is re-checked on the following
//! evaluation and confirmed if it still holds five.

use crate::board::{Alignment, Board, Pos, Stone, Token, ADJACENT_TO_WIN, CAPTURES_TO_WIN};

/// A five-in-a-row waiting for confirmation.
///
/// Refers to the token that completed the run by position and placement
/// serial, so a different token later placed on the same cell is not
/// mistaken for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFive {
    pub pos: Pos,
    pub serial: u32,
    pub owner: Stone,
}

impl PendingFive {
    /// Pending five anchored on the token at `pos`, if that token completes one
    pub fn detect(board: &Board, pos: Pos) -> Option<Self> {
        let (x, y) = pos.coords();
        let token = board.token(x, y)?;
        if token.longest_run() >= ADJACENT_TO_WIN {
            Some(Self {
                pos,
                serial: token.serial(),
                owner: token.owner(),
            })
        } else {
            None
        }
    }

    /// Whether `token` (found at `pos`) is the anchor of this pending five
    #[inline]
    pub fn is_anchor(&self, pos: Pos, token: &Token) -> bool {
        self.pos == pos && self.serial == token.serial()
    }

    /// The anchor is still on the board and still part of a long enough run
    pub fn holds(&self, board: &Board) -> bool {
        let (x, y) = self.pos.coords();
        board
            .token(x, y)
            .is_some_and(|t| t.serial() == self.serial && t.longest_run() >= ADJACENT_TO_WIN)
    }
}

/// What the pending-five check observed, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinEvent {
    FiveFormed(Stone),
    FiveBroken(Stone),
    Confirmed(Stone),
}

/// Run the pending-five state machine after a placement at `placed`.
///
/// An existing pending five is resolved first: confirmed if it still holds,
/// dropped otherwise. Only once nothing is pending is the new placement
/// checked for a five of its own.
///
/// # Returns
/// The winner, if a pending five was confirmed.
pub fn check_adjacent(
    board: &Board,
    pending: &mut Option<PendingFive>,
    placed: Pos,
    events: &mut Vec<WinEvent>,
) -> Option<Stone> {
    if let Some(five) = pending.take() {
        if five.holds(board) {
            events.push(WinEvent::Confirmed(five.owner));
            *pending = Some(five);
            return Some(five.owner);
        }
        events.push(WinEvent::FiveBroken(five.owner));
    }

    if let Some(five) = PendingFive::detect(board, placed) {
        events.push(WinEvent::FiveFormed(five.owner));
        *pending = Some(five);
    }
    None
}

/// Forget the pending five if its anchor token was just removed.
///
/// # Returns
/// The owner of the broken five, if any.
pub fn release_if_anchor(
    pending: &mut Option<PendingFive>,
    pos: Pos,
    removed: &Token,
) -> Option<Stone> {
    match *pending {
        Some(five) if five.is_anchor(pos, removed) => {
            *pending = None;
            Some(five.owner)
        }
        _ => None,
    }
}

/// Capture count reaching the threshold wins immediately.
#[inline]
pub fn is_capture_win(captures: u32) -> bool {
    captures >= CAPTURES_TO_WIN
}

/// Positions of the longest run through `pos`, ends included, if it is a five or more.
pub fn five_line_at(board: &Board, pos: Pos) -> Option<Vec<Pos>> {
    let (x, y) = pos.coords();
    let token = board.token(x, y)?;
    let alignment = Alignment::ALL
        .into_iter()
        .max_by_key(|&a| token.adjacent(a))?;
    if token.adjacent(alignment) < ADJACENT_TO_WIN {
        return None;
    }

    let (dx, dy) = alignment.delta();
    let owner = token.owner();
    let mut start = (x, y);
    while board.get(start.0 - dx, start.1 - dy).stone() == Some(owner) {
        start = (start.0 - dx, start.1 - dy);
    }

    let line = (0..token.adjacent(alignment) as i32)
        .filter_map(|i| Pos::checked(start.0 + dx * i, start.1 + dy * i))
        .collect();
    Some(line)
}
