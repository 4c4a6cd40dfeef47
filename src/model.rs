//! Board Model Builder — turn input to constraint model.
//!
//! Converts the host-supplied revealed/flag lists into per-cell state plus
//! one `Constraint` per revealed numbered cell. The model is rebuilt fresh
//! every turn; nothing is carried over between analyses.

use crate::types::{
    cell_key, CellContent, FlagGrid, NeighborCache, RevealedGrid, TurnInput, EXPOSED_MINE, HIDDEN,
};
use std::collections::{HashMap, HashSet};

/// Boards larger than this per side are treated as malformed input.
const MAX_DIM: usize = 1024;

/// The mine-count relationship declared by one revealed numbered cell over
/// its still-hidden neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// The revealed numbered cell this constraint comes from.
    pub origin: (usize, usize),
    /// Its declared value (0-8).
    pub value: u8,
    /// Hidden, unflagged neighbors in stable row-major order.
    pub unresolved: Vec<u32>,
    /// Same cells as `unresolved`, for O(1) membership tests.
    pub unresolved_set: HashSet<u32>,
    /// Neighbors already flagged.
    pub flagged: usize,
    /// Mines still unaccounted for: `value - flagged`. Negative on an
    /// inconsistent board; the solver must tolerate that, not crash.
    pub missing: i32,
}

impl Constraint {
    /// A constraint is feasible iff its missing count can still be met by
    /// its unresolved neighbors.
    pub fn is_feasible(&self) -> bool {
        self.missing >= 0 && (self.missing as usize) <= self.unresolved.len()
    }

    #[inline]
    pub fn contains(&self, key: u32) -> bool {
        self.unresolved_set.contains(&key)
    }
}

/// Per-turn model: cell state grids, all constraints, and the hidden cells
/// that are candidates for the next reveal.
pub struct BoardModel {
    pub rows: usize,
    pub cols: usize,
    pub revealed: RevealedGrid,
    pub flags: FlagGrid,
    pub neighbors: NeighborCache,
    pub constraints: Vec<Constraint>,
    /// Hidden, unflagged cells in stable row-major order.
    pub hidden: Vec<u32>,
    /// cell key -> indices into `constraints` that include the cell.
    pub touching: HashMap<u32, Vec<usize>>,
    degenerate: bool,
}

impl BoardModel {
    /// Build the model for one turn.
    ///
    /// Malformed input (zero or absurd dimensions) yields an empty, inert
    /// model; individual bad list entries (out of bounds, unparseable
    /// content) are skipped without poisoning the rest. Duplicate revealed
    /// entries: the last one wins.
    pub fn build(input: &TurnInput) -> BoardModel {
        let rows = input.rows;
        let cols = input.cols;

        if rows == 0 || cols == 0 || rows > MAX_DIM || cols > MAX_DIM {
            return BoardModel {
                rows: 0,
                cols: 0,
                revealed: RevealedGrid::new(0, 0),
                flags: FlagGrid::new(0, 0),
                neighbors: NeighborCache::new(0, 0),
                constraints: Vec::new(),
                hidden: Vec::new(),
                touching: HashMap::new(),
                degenerate: true,
            };
        }

        let mut revealed = RevealedGrid::new(rows, cols);
        for cell in &input.revealed {
            if !revealed.in_bounds(cell.row, cell.col) {
                continue;
            }
            match CellContent::parse(&cell.content) {
                Some(CellContent::Number(n)) => revealed.set(cell.row, cell.col, n as i8),
                Some(CellContent::Mine) => revealed.set(cell.row, cell.col, EXPOSED_MINE),
                None => {}
            }
        }

        let mut flags = FlagGrid::new(rows, cols);
        for cell in &input.flagged {
            if !revealed.in_bounds(cell.row, cell.col) {
                continue;
            }
            // A flag on a revealed cell is stale host state; the reveal wins.
            if revealed.get(cell.row, cell.col) == HIDDEN {
                flags.set(cell.row, cell.col, true);
            }
        }

        let neighbors = NeighborCache::new(rows, cols);

        let mut hidden = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if revealed.get(row, col) == HIDDEN && !flags.get(row, col) {
                    hidden.push(cell_key(row, col));
                }
            }
        }

        // Every revealed numbered cell, including 0, yields exactly one
        // constraint. Exposed mines yield none.
        let mut constraints = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if !revealed.is_number(row, col) {
                    continue;
                }
                let value = revealed.get(row, col) as u8;

                let mut unresolved = Vec::new();
                let mut unresolved_set = HashSet::new();
                let mut flagged = 0usize;

                for &(nr, nc) in neighbors.get(row, col) {
                    if flags.get(nr, nc) {
                        flagged += 1;
                    } else if revealed.get(nr, nc) == HIDDEN {
                        let key = cell_key(nr, nc);
                        unresolved.push(key);
                        unresolved_set.insert(key);
                    }
                }

                constraints.push(Constraint {
                    origin: (row, col),
                    value,
                    unresolved,
                    unresolved_set,
                    flagged,
                    missing: value as i32 - flagged as i32,
                });
            }
        }

        let mut touching: HashMap<u32, Vec<usize>> = HashMap::new();
        for (idx, c) in constraints.iter().enumerate() {
            for &key in &c.unresolved {
                touching.entry(key).or_default().push(idx);
            }
        }

        BoardModel {
            rows,
            cols,
            revealed,
            flags,
            neighbors,
            constraints,
            hidden,
            touching,
            degenerate: false,
        }
    }

    /// True for the inert model produced from malformed input. Callers fall
    /// back to a uniform-random choice in that case.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Fraction of the board that is revealed, in [0, 1].
    pub fn revealed_fraction(&self) -> f64 {
        let total = self.rows * self.cols;
        if total == 0 {
            return 0.0;
        }
        self.revealed.revealed_count() as f64 / total as f64
    }

    /// True if the cell is adjacent to a revealed 0.
    pub fn adjacent_to_zero(&self, row: usize, col: usize) -> bool {
        self.neighbors
            .get(row, col)
            .iter()
            .any(|&(nr, nc)| self.revealed.get(nr, nc) == 0)
    }

    /// Highest revealed numeric value among the cell's neighbors, if any.
    pub fn max_revealed_neighbor(&self, row: usize, col: usize) -> Option<u8> {
        self.neighbors
            .get(row, col)
            .iter()
            .filter(|&&(nr, nc)| self.revealed.is_number(nr, nc))
            .map(|&(nr, nc)| self.revealed.get(nr, nc) as u8)
            .max()
    }

    /// True if the cell touches at least one revealed numbered cell.
    pub fn is_frontier(&self, row: usize, col: usize) -> bool {
        self.max_revealed_neighbor(row, col).is_some()
    }
}
