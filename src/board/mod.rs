//! Board representation for Gomoku

pub mod board;


use std::fmt;

// Re-exports
pub use board::{Board, Token};

/// Board size (19x19)
pub const BOARD_SIZE: usize = 19;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 361

/// Number of participants in a game
pub const PLAYER_COUNT: usize = 2;

/// Pairs a player must capture to win outright
pub const CAPTURES_TO_WIN: u32 = 10;

/// Run length that starts a pending win
pub const ADJACENT_TO_WIN: u8 = 5;

/// Player colours. Black is player 1 and always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub const ALL: [Stone; PLAYER_COUNT] = [Stone::Black, Stone::White];

    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Zero-based seat index
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Stone::Black => 0,
            Stone::White => 1,
        }
    }

    /// One-based player number, as shown to humans
    #[inline]
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Colour to move on the given turn index
    #[inline]
    pub fn for_turn(turn: u32) -> Stone {
        Stone::ALL[turn as usize % PLAYER_COUNT]
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => f.write_str("Black"),
            Stone::White => f.write_str("White"),
        }
    }
}

/// Content of a board coordinate, including coordinates off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    OutOfBounds,
    Empty,
    Stone(Stone),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn stone(self) -> Option<Stone> {
        match self {
            Cell::Stone(stone) => Some(stone),
            _ => None,
        }
    }

    /// True when the cell holds a token that does not belong to `stone`
    #[inline]
    pub fn is_opponent_of(self, stone: Stone) -> bool {
        matches!(self, Cell::Stone(other) if other != stone)
    }
}

/// The four axes along which runs are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Horizontal,
    Vertical,
    DiagPositive,
    DiagNegative,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::Horizontal,
        Alignment::Vertical,
        Alignment::DiagPositive,
        Alignment::DiagNegative,
    ];

    /// Unit step (dx, dy) walking forward along the alignment
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Alignment::Horizontal => (1, 0),
            Alignment::Vertical => (0, 1),
            Alignment::DiagPositive => (1, 1),
            Alignment::DiagNegative => (1, -1),
        }
    }

    /// Slot of this alignment in a token's counter array
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The eight directions checked for captures
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < BOARD_SIZE as u8 && y < BOARD_SIZE as u8);
        Self { x, y }
    }

    /// Build a position from signed coordinates, `None` when off the board
    #[inline]
    pub fn checked(x: i32, y: i32) -> Option<Self> {
        if Self::is_valid(x, y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            x: (idx % BOARD_SIZE) as u8,
            y: (idx / BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(x: i32, y: i32) -> bool {
        x >= 0 && x < BOARD_SIZE as i32 && y >= 0 && y < BOARD_SIZE as i32
    }

    /// Signed coordinates, handy for direction arithmetic
    #[inline]
    pub fn coords(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
