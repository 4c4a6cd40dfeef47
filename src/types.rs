//! Core data types for the decision engine.
//!
//! All grid types use flat `Vec` storage with row-major layout:
//! `cells[row * cols + col]`. The engine only ever sees the *revealed*
//! view of the board — true mine positions are never an input.

use serde::{Deserialize, Serialize};

/// Sentinel for a cell that is still hidden.
pub const HIDDEN: i8 = -1;
/// Sentinel for a revealed cell that turned out to be a mine.
pub const EXPOSED_MINE: i8 = 9;

/// Bit-pack (row, col) into a single u32 key.
#[inline(always)]
pub fn cell_key(row: usize, col: usize) -> u32 {
    ((row as u32) << 16) | (col as u32)
}

/// Decode a packed cell key back to (row, col).
#[inline(always)]
pub fn decode_key(key: u32) -> (usize, usize) {
    ((key >> 16) as usize, (key & 0xFFFF) as usize)
}

/// Manhattan distance between two cells.
#[inline(always)]
pub fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Content of a revealed cell as reported by the game host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    /// Neighbor mine count 0-8.
    Number(u8),
    /// The cell held a mine (the game already lost it).
    Mine,
}

impl CellContent {
    /// Parse the host's value string: `"0"`..`"8"`, or `""`/`"M"` for an
    /// exposed mine. Anything else is unparseable and yields `None`.
    pub fn parse(raw: &str) -> Option<CellContent> {
        match raw.trim() {
            "" | "M" | "m" => Some(CellContent::Mine),
            s => match s.parse::<u8>() {
                Ok(n) if n <= 8 => Some(CellContent::Number(n)),
                _ => None,
            },
        }
    }
}

/// Revealed state of each cell: -1 = hidden, 0-8 = revealed number,
/// 9 = exposed mine.
#[derive(Clone)]
pub struct RevealedGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<i8>,
}

impl RevealedGrid {
    /// Create a new grid with all cells hidden (-1).
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![HIDDEN; rows * cols],
        }
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.cells[row * self.cols + col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, val: i8) {
        self.cells[row * self.cols + col] = val;
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// True if the cell is revealed with a numeric value (0-8).
    #[inline(always)]
    pub fn is_number(&self, row: usize, col: usize) -> bool {
        let v = self.get(row, col);
        (0..=8).contains(&v)
    }

    /// Count of revealed cells (numbers and exposed mines).
    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != HIDDEN).count()
    }
}

/// Boolean flag state for each cell.
/// Uses `Vec<u8>` (0/1) instead of `Vec<bool>` for simpler WASM interop.
#[derive(Clone)]
pub struct FlagGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<u8>,
}

impl FlagGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col] != 0
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, val: bool) {
        self.cells[row * self.cols + col] = val as u8;
    }

    /// Count of flagged cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to grid bounds) for every
/// cell. Indexed by `row * cols + col`, each entry is a slice of
/// `(row, col)` pairs.
pub struct NeighborCache {
    pub rows: usize,
    pub cols: usize,
    /// Flat storage of all neighbor pairs.
    data: Vec<(usize, usize)>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbor cache for a board of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        let total = rows * cols;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..rows {
            for col in 0..cols {
                offsets.push(data.len());
                for dr in -1i32..=1 {
                    for dc in -1i32..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i32 + dr;
                        let nc = col as i32 + dc;
                        if nr >= 0 && nr < rows as i32 && nc >= 0 && nc < cols as i32 {
                            data.push((nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            rows,
            cols,
            data,
            offsets,
        }
    }

    /// Get the pre-computed neighbors for cell (row, col).
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> &[(usize, usize)] {
        let idx = row * self.cols + col;
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.data[start..end]
    }
}

// ─── Turn input (supplied by the game host each turn) ───────────────────────

/// One revealed cell as reported by the host. `content` is the raw value
/// string: `"0"`..`"8"`, or `""`/`"M"` for an exposed mine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealedCell {
    pub row: usize,
    pub col: usize,
    pub content: String,
}

/// One flagged cell as reported by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlaggedCell {
    pub row: usize,
    pub col: usize,
}

/// One prior action from the host's move history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlayerAction {
    /// A reveal, with the content that came back from the board.
    Reveal {
        row: usize,
        col: usize,
        #[serde(default)]
        result: String,
    },
    /// A flag placement.
    Flag { row: usize, col: usize },
}

impl PlayerAction {
    /// The cell this action touched.
    pub fn cell(&self) -> (usize, usize) {
        match *self {
            PlayerAction::Reveal { row, col, .. } => (row, col),
            PlayerAction::Flag { row, col } => (row, col),
        }
    }

    pub fn is_reveal(&self) -> bool {
        matches!(self, PlayerAction::Reveal { .. })
    }
}

/// Everything the host supplies for one analysis turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnInput {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub revealed: Vec<RevealedCell>,
    #[serde(default)]
    pub flagged: Vec<FlaggedCell>,
    #[serde(default)]
    pub history: Vec<PlayerAction>,
}
