//! Token arena with incremental adjacency bookkeeping
//!
//! Every token stores, for each alignment, the length of the contiguous
//! same-owner run passing through it (itself included). Placing a token
//! merges the runs on both sides and writes the merged length to every
//! member; removing one rescans both sides of the gap, since a removal can
//! split one run into two.

use super::{Alignment, Cell, Pos, Stone, BOARD_SIZE, PLAYER_COUNT, TOTAL_CELLS};

/// A placed piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    owner: Stone,
    adjacent: [u8; 4],
    serial: u32,
}

impl Token {
    #[inline]
    pub fn owner(&self) -> Stone {
        self.owner
    }

    /// Run length through this token along `alignment`, itself included
    #[inline]
    pub fn adjacent(&self, alignment: Alignment) -> u8 {
        self.adjacent[alignment.index()]
    }

    /// Longest run through this token over all alignments
    #[inline]
    pub fn longest_run(&self) -> u8 {
        self.adjacent.iter().copied().max().unwrap_or(0)
    }

    /// Placement number. Two tokens placed on the same cell at different
    /// times never share a serial.
    #[inline]
    pub fn serial(&self) -> u32 {
        self.serial
    }
}

/// Game board: one optional token per cell plus per-colour token counts
#[derive(Debug, Clone)]
pub struct Board {
    cells: [Option<Token>; TOTAL_CELLS],
    counts: [u32; PLAYER_COUNT],
    next_serial: u32,
}

#[inline]
fn cell_index(x: i32, y: i32) -> Option<usize> {
    Pos::checked(x, y).map(Pos::to_index)
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; TOTAL_CELLS],
            counts: [0; PLAYER_COUNT],
            next_serial: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Content at (x, y); coordinates off the board are reported, not rejected
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        match cell_index(x, y) {
            None => Cell::OutOfBounds,
            Some(idx) => match self.cells[idx] {
                Some(token) => Cell::Stone(token.owner),
                None => Cell::Empty,
            },
        }
    }

    #[inline]
    pub fn get_pos(&self, pos: Pos) -> Cell {
        self.get(pos.x as i32, pos.y as i32)
    }

    /// Token at (x, y), if any
    #[inline]
    pub fn token(&self, x: i32, y: i32) -> Option<&Token> {
        cell_index(x, y).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Run length through (x, y) along `alignment`; 0 for empty or off-board cells
    #[inline]
    pub fn adjacent_count(&self, x: i32, y: i32, alignment: Alignment) -> u8 {
        self.token(x, y).map_or(0, |t| t.adjacent(alignment))
    }

    #[inline]
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Cell::Empty
    }

    /// Place a token. Returns false if the cell is occupied or off the board.
    /// No rule checks happen here; see `rules::validate`.
    pub fn place(&mut self, x: i32, y: i32, owner: Stone) -> bool {
        let Some(pos) = Pos::checked(x, y) else {
            return false;
        };
        let idx = pos.to_index();
        if self.cells[idx].is_some() {
            return false;
        }

        self.cells[idx] = Some(Token {
            owner,
            adjacent: [1; 4],
            serial: self.next_serial,
        });
        self.next_serial = self.next_serial.wrapping_add(1);
        self.counts[owner.index()] += 1;

        for alignment in Alignment::ALL {
            self.merge_runs(x, y, owner, alignment);
        }
        true
    }

    /// Remove the token at (x, y), repairing the counters of the runs it belonged to
    pub fn remove(&mut self, x: i32, y: i32) -> Option<Token> {
        let pos = Pos::checked(x, y)?;
        let token = self.cells[pos.to_index()].take()?;
        self.counts[token.owner.index()] -= 1;

        for alignment in Alignment::ALL {
            self.rescan_from_gap(x, y, token.owner, alignment);
        }
        Some(token)
    }

    /// Empty the board. Counters vanish with their tokens, so no rescan is needed.
    pub fn clear(&mut self) {
        self.cells = [None; TOTAL_CELLS];
        self.counts = [0; PLAYER_COUNT];
    }

    /// Tokens of one colour on the board
    #[inline]
    pub fn count(&self, stone: Stone) -> u32 {
        self.counts[stone.index()]
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.counts.iter().sum()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.stone_count() == 0
    }

    /// Positions holding `stone`, in index order
    pub fn positions(&self, stone: Stone) -> impl Iterator<Item = Pos> + '_ {
        self.tokens()
            .filter(move |(_, t)| t.owner == stone)
            .map(|(pos, _)| pos)
    }

    /// All tokens with their positions, in index order
    pub fn tokens(&self) -> impl Iterator<Item = (Pos, &Token)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.as_ref().map(|t| (Pos::from_index(idx), t)))
    }

    /// Counter stored by a same-owner neighbour, 0 otherwise
    #[inline]
    fn neighbour_run(&self, x: i32, y: i32, owner: Stone, alignment: Alignment) -> u8 {
        match self.token(x, y) {
            Some(t) if t.owner == owner => t.adjacent(alignment),
            _ => 0,
        }
    }

    fn merge_runs(&mut self, x: i32, y: i32, owner: Stone, alignment: Alignment) {
        let (dx, dy) = alignment.delta();
        let prev = self.neighbour_run(x - dx, y - dy, owner, alignment) as i32;
        let next = self.neighbour_run(x + dx, y + dy, owner, alignment) as i32;
        let total = (prev + 1 + next) as u8;

        for i in -prev..=next {
            self.set_counter(x + dx * i, y + dy * i, alignment, total);
        }
    }

    fn rescan_from_gap(&mut self, x: i32, y: i32, owner: Stone, alignment: Alignment) {
        let (dx, dy) = alignment.delta();
        for sign in [-1, 1] {
            let (sx, sy) = (dx * sign, dy * sign);
            let mut len = 0;
            while self.get(x + sx * (len + 1), y + sy * (len + 1)) == Cell::Stone(owner) {
                len += 1;
            }
            for i in 1..=len {
                self.set_counter(x + sx * i, y + sy * i, alignment, len as u8);
            }
        }
    }

    #[inline]
    fn set_counter(&mut self, x: i32, y: i32, alignment: Alignment, value: u8) {
        if let Some(token) = cell_index(x, y).and_then(|idx| self.cells[idx].as_mut()) {
            token.adjacent[alignment.index()] = value;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
