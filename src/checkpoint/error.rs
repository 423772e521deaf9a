//! Storage error types.

use thiserror::Error;

/// Errors that can occur while writing or clearing the session record.
///
/// These are best-effort failures: callers log them and keep playing.
/// Loading never produces an error; a corrupt record loads as absent or
/// with per-field defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Serializing the session record failed
    #[error("session serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Reading from or writing to the storage slot failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
