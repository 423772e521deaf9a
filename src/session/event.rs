//! Events emitted by the session for the rendering/feedback layer.
//!
//! Events are plain values returned by session operations. The core
//! never depends on what observers do with them.

use crate::core::Board;
use serde::{Deserialize, Serialize};

/// Why a session reached its end state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameOverReason {
    /// The board is full with no adjacent equal pair.
    BoardFull,
    /// A timed session's countdown reached zero.
    TimeExpired,
}

/// A notification produced by a session operation, in emission order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SessionEvent {
    /// The board changed; `previous` lets observers detect which cells
    /// doubled, for merge-specific effects.
    BoardChanged { board: Board, previous: Board },
    /// The score changed; carries the possibly-raised best score.
    ScoreChanged { score: u32, best_score: u32 },
    /// A tile reached the winning value for the first time this session.
    Won,
    /// The session ended; fires at most once per session.
    GameOver { reason: GameOverReason },
    /// One second elapsed on a timed session's countdown.
    TimerTick { seconds_remaining: u32 },
    /// The undo budget or history occupancy changed.
    UndoAvailabilityChanged { undos_remaining: u8, can_undo: bool },
}
