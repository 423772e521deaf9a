//! The 4x4 tile grid and its pure operations.
//!
//! A board is a fixed 4x4 row-major grid of cells. Each cell is either
//! empty or holds a power-of-two tile value (2, 4, 8, ...). The board
//! never resizes for the lifetime of a session.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the grid. Fixed for the lifetime of a session.
pub const BOARD_SIZE: usize = 4;

/// A single grid position: empty, or a power-of-two tile value >= 2.
pub type Cell = Option<u32>;

/// A direction in which tiles slide and merge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}

/// Fixed 4x4 grid of cells, row-major.
///
/// Serializes transparently as a 4x4 array of `null | int`, matching the
/// persisted session schema.
///
/// # Example
///
/// ```rust
/// use slide48::core::Board;
///
/// let mut board = Board::empty();
/// assert_eq!(board.count_empty(), 16);
///
/// board.set(0, 0, Some(2));
/// board.set(0, 1, Some(2));
/// assert_eq!(board.get(0, 1), Some(2));
/// assert!(!board.is_terminal());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create a board with every cell empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a board directly from its rows.
    pub fn from_rows(rows: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { rows }
    }

    /// The cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    /// Overwrite the cell at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.rows[row][col] = cell;
    }

    /// Copy of row `index`.
    pub fn row(&self, index: usize) -> [Cell; BOARD_SIZE] {
        self.rows[index]
    }

    /// Replace row `index`.
    pub fn set_row(&mut self, index: usize, row: [Cell; BOARD_SIZE]) {
        self.rows[index] = row;
    }

    /// Copy of column `index`, top to bottom.
    pub fn col(&self, index: usize) -> [Cell; BOARD_SIZE] {
        [
            self.rows[0][index],
            self.rows[1][index],
            self.rows[2][index],
            self.rows[3][index],
        ]
    }

    /// Replace column `index`, top to bottom.
    pub fn set_col(&mut self, index: usize, col: [Cell; BOARD_SIZE]) {
        for (row, cell) in col.into_iter().enumerate() {
            self.rows[row][index] = cell;
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells().filter(Cell::is_none).count()
    }

    /// The largest tile value on the board, or 0 if the board is empty.
    pub fn max_tile(&self) -> u32 {
        self.cells().flatten().max().unwrap_or(0)
    }

    /// Positions of all empty cells, row-major.
    pub fn empty_positions(&self) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.rows[row][col].is_none() {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    /// Place a new tile in a uniformly random empty cell.
    ///
    /// The tile is 2 with probability 0.9 and 4 with probability 0.1.
    /// On a full board this is a no-op returning `None`; otherwise the
    /// spawned `(row, col, value)` is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slide48::core::Board;
    /// use rand::{rngs::SmallRng, SeedableRng};
    ///
    /// let mut board = Board::empty();
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let spawned = board.spawn_tile(&mut rng);
    /// assert!(spawned.is_some());
    /// assert_eq!(board.count_empty(), 15);
    /// ```
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize, u32)> {
        let empty = self.empty_positions();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[rng.gen_range(0..empty.len())];
        let value = if rng.gen::<f64>() < 0.9 { 2 } else { 4 };
        self.rows[row][col] = Some(value);
        Some((row, col, value))
    }

    /// True iff no legal move remains: every cell is occupied and no two
    /// orthogonally adjacent cells hold equal values.
    pub fn is_terminal(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let cell = self.rows[row][col];
                if cell.is_none() {
                    return false;
                }
                if col + 1 < BOARD_SIZE && cell == self.rows[row][col + 1] {
                    return false;
                }
                if row + 1 < BOARD_SIZE && cell == self.rows[row + 1][col] {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in &self.rows {
            write!(f, "|")?;
            for cell in row {
                match cell {
                    Some(value) => write!(f, "{value:^6}|")?,
                    None => write!(f, "      |")?,
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}
