//! Heuristic move scan
//!
//! Walks every token on the board and scores the empty cells around it:
//! - captures of endangered opponent tokens
//! - extending our runs and blocking theirs, weighted by run length
//! - shielding our own tokens that could be captured next ply
//!
//! When no token offers anything, the board edges are probed, and as a last
//! resort a random legal cell is taken.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::board::{Alignment, Pos, Stone, ADJACENT_TO_WIN, BOARD_SIZE, TOTAL_CELLS};
use crate::game::Game;
use crate::rules;

use super::patterns::{capture_priority, run_priority, Priority};

/// How the scan arrived at its choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSource {
    /// Scored from the tokens on the board
    Tokens,
    /// Nothing scored; picked a free cell on the board edge
    EdgeProbe,
    /// Nothing scored and no edge cell was free
    Random,
}

/// Outcome of a scan
#[derive(Debug, Clone)]
pub struct Scan {
    pub best: Option<Pos>,
    pub priority: i32,
    pub source: ScanSource,
    /// Every cell with a positive priority, highest first
    pub candidates: Vec<(Pos, i32)>,
}

/// Priority scan for one player over one position
pub struct Heuristic<'a> {
    game: &'a Game,
    me: Stone,
    rng: &'a mut StdRng,
    best: Option<(Pos, i32)>,
    candidates: HashMap<Pos, i32>,
}

impl<'a> Heuristic<'a> {
    pub fn new(game: &'a Game, me: Stone, rng: &'a mut StdRng) -> Self {
        Self {
            game,
            me,
            rng,
            best: None,
            candidates: HashMap::new(),
        }
    }

    /// Score the position. `futile` lists opponent tokens that completed a
    /// run of five; capturing any member of such a run outranks everything else.
    pub fn run(mut self, futile: &[Pos]) -> Scan {
        for &pos in futile {
            let Some(line) = rules::five_line_at(self.game.board(), pos) else {
                continue;
            };
            for member in line {
                let (x, y) = member.coords();
                if let Some(victim) = self.game.get(x, y).stone().filter(|&s| s != self.me) {
                    self.attempt_capture(x, y, victim, Priority::FUTILE);
                }
            }
        }

        let tokens: Vec<(Pos, Stone)> = self
            .game
            .board()
            .tokens()
            .map(|(pos, token)| (pos, token.owner()))
            .collect();
        for (pos, owner) in tokens {
            self.evaluate_token(pos, owner);
        }

        let mut source = ScanSource::Tokens;
        if self.best.is_none() {
            source = ScanSource::EdgeProbe;
            self.probe_edges();
        }
        if self.best.is_none() {
            source = ScanSource::Random;
            self.pick_random();
        }

        let mut candidates: Vec<(Pos, i32)> = self.candidates.into_iter().collect();
        // Shuffle first so equal priorities come out in no fixed order
        candidates.shuffle(&mut *self.rng);
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let (best, priority) = match self.best {
            Some((pos, priority)) => (Some(pos), priority),
            None => (None, 0),
        };
        Scan {
            best,
            priority,
            source,
            candidates,
        }
    }

    /// Offer (x, y) at `priority`. Equal offers replace the current choice
    /// one time in eight.
    fn evaluate(&mut self, x: i32, y: i32, priority: i32) {
        let Some(pos) = Pos::checked(x, y) else {
            return;
        };
        let replace = match self.best {
            None => true,
            Some((_, current)) => {
                priority > current || (priority == current && self.rng.random_ratio(1, 8))
            }
        };
        if replace {
            self.best = Some((pos, priority));
        }

        if priority > 0 {
            let entry = self.candidates.entry(pos).or_insert(priority);
            if *entry < priority {
                *entry = priority;
            }
        }
    }

    /// A legal placement for `stone`
    #[inline]
    fn is_free(&self, x: i32, y: i32, stone: Stone) -> bool {
        rules::is_legal(self.game.board(), x, y, stone)
    }

    /// Run length `owner` would have through (x, y) after placing there
    fn updated_adjacents(&self, x: i32, y: i32, owner: Stone, alignment: Alignment) -> i32 {
        let (dx, dy) = alignment.delta();
        let board = self.game.board();
        let side = |sx: i32, sy: i32| -> i32 {
            if board.get(sx, sy).stone() == Some(owner) {
                board.adjacent_count(sx, sy, alignment) as i32
            } else {
                0
            }
        };
        side(x - dx, y - dy) + 1 + side(x + dx, y + dy)
    }

    /// How long a run of `owner` through (x, y) could grow along `alignment`.
    ///
    /// Counts cells holding `owner` or free for `owner` to play. Stops once
    /// the answer reaches a full five since nothing compares above that.
    fn adjacent_capacity(&self, x: i32, y: i32, owner: Stone, alignment: Alignment) -> i32 {
        let (dx, dy) = alignment.delta();
        let reach = ADJACENT_TO_WIN as i32 - 1;
        let mut capacity = 1;
        for sign in [-1, 1] {
            let mut i = 1;
            while i <= reach {
                let (cx, cy) = (x + dx * sign * i, y + dy * sign * i);
                if self.game.get(cx, cy).stone() != Some(owner) && !self.is_free(cx, cy, owner) {
                    break;
                }
                capacity += 1;
                i += 1;
            }
        }
        capacity
    }

    /// Look for cells from which we capture the `victim` token at (x, y).
    fn attempt_capture(&mut self, x: i32, y: i32, victim: Stone, base: i32) {
        if !self.game.is_in_danger(x, y, victim) {
            return;
        }
        let target = Pos::new(x as u8, y as u8);
        let held = self.game.capture_count(self.me);

        for alignment in Alignment::ALL {
            let (dx, dy) = alignment.delta();
            for i in -2..=2 {
                let (cx, cy) = (x + dx * i, y + dy * i);
                if i == 0
                    || !self.is_free(cx, cy, self.me)
                    || !self.game.would_capture(target, cx, cy, self.me)
                {
                    continue;
                }

                let pairs = self.game.count_captures(cx, cy, self.me);
                let priority = base + capture_priority(pairs, held);
                for a in Alignment::ALL {
                    let adjacent = self.updated_adjacents(cx, cy, victim, a);
                    let capacity = self.adjacent_capacity(cx, cy, victim, a);
                    self.evaluate(cx, cy, priority + run_priority(adjacent, capacity, false));
                }
            }
        }
    }

    /// Score the first non-`owner` cell at each end of the run through (x, y).
    fn surround_token(&mut self, x: i32, y: i32, owner: Stone, alignment: Alignment) {
        let (dx, dy) = alignment.delta();
        let capacity = self.adjacent_capacity(x, y, owner, alignment);
        let defending = owner == self.me && self.game.is_in_danger(x, y, owner);
        let run = self.game.adjacent_count(x, y, alignment) as i32;

        for sign in [-1, 1] {
            let mut i = 1;
            let (cx, cy) = loop {
                let cell = (x + dx * sign * i, y + dy * sign * i);
                if self.game.get(cell.0, cell.1).stone() != Some(owner) {
                    break cell;
                }
                i += 1;
            };
            if !self.is_free(cx, cy, self.me) {
                continue;
            }

            let adjacent = self.updated_adjacents(cx, cy, owner, alignment);
            // The far side is already a five of its own
            if adjacent - 1 - run >= ADJACENT_TO_WIN as i32 {
                continue;
            }

            let pairs = self.game.count_captures(cx, cy, self.me);
            let priority = pairs as i32 * Priority::CAPTURE;
            self.evaluate(cx, cy, priority + run_priority(adjacent, capacity, defending));
        }
    }

    fn evaluate_token(&mut self, pos: Pos, owner: Stone) {
        let (x, y) = pos.coords();
        if owner != self.me {
            self.attempt_capture(x, y, owner, 0);
        }
        for alignment in Alignment::ALL {
            if self.game.adjacent_count(x, y, alignment) < ADJACENT_TO_WIN {
                self.surround_token(x, y, owner, alignment);
            }
        }
    }

    fn probe_edges(&mut self) {
        let last = BOARD_SIZE as i32 - 1;
        for i in 1..last {
            for (x, y) in [(i, 0), (0, i), (i, last), (last, i)] {
                if self.is_free(x, y, self.me) {
                    self.evaluate(x, y, 0);
                }
            }
        }
    }

    fn pick_random(&mut self) {
        let free: Vec<Pos> = (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(|p| self.is_free(p.x as i32, p.y as i32, self.me))
            .collect();
        if let Some(&pos) = free.choose(&mut *self.rng) {
            self.best = Some((pos, 0));
        }
    }
}
