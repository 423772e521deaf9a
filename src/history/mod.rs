//! Bounded undo history.
//!
//! The history holds at most three pre-move snapshots. Pushing a fourth
//! evicts the oldest (FIFO); undo pops the newest (LIFO). The history
//! owns its snapshots exclusively and knows nothing about undo budgets,
//! which are session state.

use crate::core::Board;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of snapshots retained for undo.
pub const HISTORY_CAP: usize = 3;

/// Immutable copy of the session fields a single undo step restores,
/// captured just before a move is applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub score: u32,
    pub time_remaining: u32,
    pub timed: bool,
}

/// Ordered sequence of at most [`HISTORY_CAP`] snapshots, oldest first.
///
/// # Example
///
/// ```rust
/// use slide48::core::Board;
/// use slide48::history::{History, Snapshot};
///
/// let mut history = History::new();
/// for score in 0..4 {
///     history.push(Snapshot {
///         board: Board::empty(),
///         score,
///         time_remaining: 0,
///         timed: false,
///     });
/// }
///
/// // The oldest snapshot (score 0) was evicted.
/// assert_eq!(history.len(), 3);
/// assert_eq!(history.pop().unwrap().score, 3);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored snapshots, keeping only the most
    /// recent [`HISTORY_CAP`] entries.
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Self {
        let mut deque: VecDeque<Snapshot> = snapshots.into();
        while deque.len() > HISTORY_CAP {
            deque.pop_front();
        }
        Self { snapshots: deque }
    }

    /// Append a snapshot, evicting the oldest when the cap is exceeded.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.snapshots.len() == HISTORY_CAP {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when no snapshot is retained.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The retained snapshots, oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}
