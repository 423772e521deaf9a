//! Slide48: game state engine for a 4x4 sliding-tile merge puzzle.
//!
//! The crate follows a "pure core, imperative shell" split. The board
//! model and move resolution are pure functions; the session layered on
//! top owns win/terminal/timer policy and returns its notifications as
//! plain event values; the shell at the outermost layer wires a session
//! to durable storage and observer callbacks.
//!
//! # Core Concepts
//!
//! - **Board**: a fixed 4x4 grid of power-of-two tiles with pure
//!   slide/merge resolution and chain-merge suppression
//! - **Session**: the authoritative game state — score, sticky win flag,
//!   bounded undo budget, optional countdown
//! - **History**: at most three pre-move snapshots, oldest evicted first
//! - **Checkpoint**: best-effort save/resume of the full session through
//!   a single storage slot
//!
//! # Example
//!
//! ```rust
//! use slide48::core::Direction;
//! use slide48::session::{Session, SessionEvent};
//!
//! let mut session = Session::start_seeded(false, None, 0, 42);
//!
//! for direction in Direction::all() {
//!     let events = session.apply_direction(direction);
//!     if events.is_empty() {
//!         continue; // illegal move, nothing happened
//!     }
//!     for event in &events {
//!         if let SessionEvent::ScoreChanged { score, .. } = event {
//!             println!("score is now {score}");
//!         }
//!     }
//!     break;
//! }
//! ```

pub mod checkpoint;
pub mod core;
pub mod game;
pub mod history;
pub mod session;

// Re-export commonly used types
pub use checkpoint::{FileStore, MemoryStore, SavedSession, SessionStore, StoreError};
pub use core::{Board, Cell, Direction};
pub use game::{Game, Observer};
pub use history::{History, Snapshot};
pub use session::{GameOverReason, Session, SessionEvent};
