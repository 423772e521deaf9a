//! Pure board engine: the grid model and move resolution.
//!
//! This module holds no session concerns (score totals, timers,
//! history). Everything here is a pure transformation over a [`Board`],
//! apart from [`Board::spawn_tile`] which draws from a caller-supplied
//! RNG.

mod board;
mod resolve;

pub use board::{Board, Cell, Direction, BOARD_SIZE};
pub use resolve::{apply_move, resolve_line, LineResolution, Merge, MoveOutcome, WIN_TILE};
