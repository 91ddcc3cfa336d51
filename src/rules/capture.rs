//! Capture rules for Ninuki-renju (Pente-style pair capture)
//!
//! Capture pattern: X-O-O-X where X is the capturing player's stone
//! and O is the opponent's stone. Only exactly 2 stones can be captured.
//! Moving into an X-O-O-X shape yourself is not a capture; it is refused
//! outright (see `is_captured`).

use crate::board::{Alignment, Board, Cell, Pos, Stone, DIRECTIONS};

/// Pair that placing `owner` at (x, y) would capture walking along (dx, dy).
///
/// The cell 3 steps away must hold the mover and the two cells between
/// must hold opponent tokens.
#[inline]
pub fn capture_in_direction(
    board: &Board,
    x: i32,
    y: i32,
    owner: Stone,
    (dx, dy): (i32, i32),
) -> Option<[Pos; 2]> {
    if board.get(x + dx * 3, y + dy * 3) != Cell::Stone(owner) {
        return None;
    }
    let first = board.get(x + dx, y + dy);
    let second = board.get(x + dx * 2, y + dy * 2);
    if first.is_opponent_of(owner) && second.is_opponent_of(owner) {
        Some([
            Pos::checked(x + dx, y + dy)?,
            Pos::checked(x + dx * 2, y + dy * 2)?,
        ])
    } else {
        None
    }
}

/// All pairs captured by placing `owner` at (x, y), in direction order.
///
/// # Returns
/// One entry per captured pair; a placement can capture in up to 8 directions.
pub fn find_captures(board: &Board, x: i32, y: i32, owner: Stone) -> Vec<[Pos; 2]> {
    DIRECTIONS
        .iter()
        .filter_map(|&dir| capture_in_direction(board, x, y, owner, dir))
        .collect()
}

/// Count how many pairs would be captured by a move.
#[inline]
pub fn count_captures(board: &Board, x: i32, y: i32, owner: Stone) -> u32 {
    DIRECTIONS
        .iter()
        .filter(|&&dir| capture_in_direction(board, x, y, owner, dir).is_some())
        .count() as u32
}

/// Check if a move would result in any captures.
#[inline]
pub fn has_capture(board: &Board, x: i32, y: i32, owner: Stone) -> bool {
    DIRECTIONS
        .iter()
        .any(|&dir| capture_in_direction(board, x, y, owner, dir).is_some())
}

/// Whether placing `owner` at `at` would remove the token at `target`.
pub fn would_capture(board: &Board, target: Pos, at: (i32, i32), owner: Stone) -> bool {
    let (ax, ay) = at;
    DIRECTIONS.iter().any(|&dir| {
        capture_in_direction(board, ax, ay, owner, dir).is_some_and(|pair| pair.contains(&target))
    })
}

/// Whether a token of `owner` at (x, y) would complete a flanked pair of its
/// own, i.e. `theirs, mine, [new], theirs` on some alignment.
///
/// The cell at (x, y) itself is not read, so this works for both
/// hypothetical and existing tokens.
pub fn is_captured(board: &Board, x: i32, y: i32, owner: Stone) -> bool {
    Alignment::ALL.iter().any(|&alignment| {
        let (dx, dy) = alignment.delta();
        let prev = board.get(x - dx, y - dy);
        let next = board.get(x + dx, y + dy);

        if prev == Cell::Stone(owner) && next.is_opponent_of(owner) {
            board.get(x - dx * 2, y - dy * 2) == next
        } else if next == Cell::Stone(owner) && prev.is_opponent_of(owner) {
            board.get(x + dx * 2, y + dy * 2) == prev
        } else {
            false
        }
    })
}

/// Whether the opponent could capture the `owner` token at (x, y) with a
/// single placement.
///
/// The token must be half of an own pair. The pair is in danger when one
/// end is flanked by the opponent and the other end is open.
pub fn is_in_danger(board: &Board, x: i32, y: i32, owner: Stone) -> bool {
    let mine = Cell::Stone(owner);
    Alignment::ALL.iter().any(|&alignment| {
        let (dx, dy) = alignment.delta();
        let prev = board.get(x - dx, y - dy);
        let next = board.get(x + dx, y + dy);
        let beyond_prev = board.get(x - dx * 2, y - dy * 2);
        let beyond_next = board.get(x + dx * 2, y + dy * 2);

        if prev == mine && next.is_opponent_of(owner) {
            beyond_prev.is_empty()
        } else if next == mine && prev.is_opponent_of(owner) {
            beyond_next.is_empty()
        } else if prev == mine && next.is_empty() {
            beyond_prev.is_opponent_of(owner)
        } else if next == mine && prev.is_empty() {
            beyond_next.is_opponent_of(owner)
        } else {
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(stones: &[(i32, i32, Stone)]) -> Board {
        let mut board = Board::new();
        for &(x, y, stone) in stones {
            assert!(board.place(x, y, stone));
        }
        board
    }

    #[test]
    fn test_basic_capture_horizontal() {
        // B W W _ : Black at (12, 9) captures
        let board = board_with(&[
            (9, 9, Stone::Black),
            (10, 9, Stone::White),
            (11, 9, Stone::White),
        ]);

        let captured = find_captures(&board, 12, 9, Stone::Black);
        assert_eq!(captured, vec![[Pos::new(11, 9), Pos::new(10, 9)]]);
        assert_eq!(count_captures(&board, 12, 9, Stone::Black), 1);
    }

    #[test]
    fn test_capture_symmetry() {
        // Same shape mirrored in every direction around the centre
        for &(dx, dy) in DIRECTIONS.iter() {
            let board = board_with(&[
                (9 + dx, 9 + dy, Stone::White),
                (9 + dx * 2, 9 + dy * 2, Stone::White),
                (9 + dx * 3, 9 + dy * 3, Stone::Black),
            ]);
            assert_eq!(count_captures(&board, 9, 9, Stone::Black), 1, "dir {:?}", (dx, dy));
            assert_eq!(count_captures(&board, 9, 9, Stone::White), 0);
        }
    }

    #[test]
    fn test_no_capture_three_stones() {
        // B W W W B is not a capture
        let board = board_with(&[
            (5, 5, Stone::Black),
            (6, 5, Stone::White),
            (7, 5, Stone::White),
            (8, 5, Stone::White),
        ]);
        assert!(!has_capture(&board, 9, 5, Stone::Black));
    }

    #[test]
    fn test_no_capture_at_board_edge() {
        // Near edge - should not crash
        let board = board_with(&[(0, 0, Stone::Black), (1, 0, Stone::White)]);
        assert!(find_captures(&board, 2, 0, Stone::Black).is_empty());
        assert!(find_captures(&board, -1, 0, Stone::Black).is_empty());
    }

    #[test]
    fn test_cross_capture() {
        //     B
        //     W
        //     W
        // B W W _ W W B
        //     W
        //     W
        //     B
        let mut stones = Vec::new();
        for &(dx, dy) in &[(1, 0), (-1, 0), (0, 1), (0, -1)] {
            stones.push((9 + dx, 9 + dy, Stone::White));
            stones.push((9 + dx * 2, 9 + dy * 2, Stone::White));
            stones.push((9 + dx * 3, 9 + dy * 3, Stone::Black));
        }
        let board = board_with(&stones);
        assert_eq!(count_captures(&board, 9, 9, Stone::Black), 4);
    }

    #[test]
    fn test_would_capture_target() {
        let board = board_with(&[
            (3, 3, Stone::White),
            (4, 4, Stone::Black),
            (5, 5, Stone::Black),
        ]);
        assert!(would_capture(&board, Pos::new(4, 4), (6, 6), Stone::White));
        assert!(would_capture(&board, Pos::new(5, 5), (6, 6), Stone::White));
        assert!(!would_capture(&board, Pos::new(3, 3), (6, 6), Stone::White));
        assert!(!would_capture(&board, Pos::new(4, 4), (6, 7), Stone::White));
    }

    #[test]
    fn test_is_captured_suicide() {
        // W B [B] W : Black may not complete the flanked pair
        let board = board_with(&[
            (4, 7, Stone::White),
            (5, 7, Stone::Black),
            (7, 7, Stone::White),
        ]);
        assert!(is_captured(&board, 6, 7, Stone::Black));
        // White playing there is an ordinary move
        assert!(!is_captured(&board, 6, 7, Stone::White));
    }

    #[test]
    fn test_is_captured_needs_same_flank() {
        // W B [B] _ : only one side flanked
        let board = board_with(&[(4, 7, Stone::White), (5, 7, Stone::Black)]);
        assert!(!is_captured(&board, 6, 7, Stone::Black));
    }

    #[test]
    fn test_is_in_danger_open_end() {
        // W B B _ : pair can be taken at (8, 2)
        let board = board_with(&[
            (5, 2, Stone::White),
            (6, 2, Stone::Black),
            (7, 2, Stone::Black),
        ]);
        assert!(is_in_danger(&board, 6, 2, Stone::Black));
        assert!(is_in_danger(&board, 7, 2, Stone::Black));
    }

    #[test]
    fn test_is_in_danger_flanked_or_free() {
        // W B B W : already flanked on both ends, nothing left to take it with
        let board = board_with(&[
            (5, 2, Stone::White),
            (6, 2, Stone::Black),
            (7, 2, Stone::Black),
            (8, 2, Stone::White),
        ]);
        assert!(!is_in_danger(&board, 6, 2, Stone::Black));

        // _ B B _ : nobody adjacent yet
        let board = board_with(&[(6, 2, Stone::Black), (7, 2, Stone::Black)]);
        assert!(!is_in_danger(&board, 6, 2, Stone::Black));

        // lone token
        let board = board_with(&[(6, 2, Stone::Black), (7, 2, Stone::White)]);
        assert!(!is_in_danger(&board, 6, 2, Stone::Black));
    }
}
