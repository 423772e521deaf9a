//! Checkpoint and resume: durable persistence of the active session.
//!
//! The full session is serialized to a single well-known storage slot
//! after every state-changing operation, so a closed game can resume
//! where it left off. Persistence is best-effort: a failed write is
//! logged and ignored, and a corrupt stored record is recovered field by
//! field with safe defaults rather than surfaced as a failure.

use crate::core::Board;
use crate::history::{History, Snapshot};
use crate::session::{Session, DEFAULT_TIME_LIMIT_SECS, UNDO_BUDGET};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub mod error;

pub use error::StoreError;

/// File name of the single storage slot.
pub const STORAGE_KEY: &str = "slide48.session.json";

/// Serializable record of a full session. Matches the storage schema:
/// camelCase keys, board as a 4x4 array of `null | int`, at most
/// [`HISTORY_CAP`](crate::history::HISTORY_CAP) history entries.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub board: Board,
    pub score: u32,
    pub best_score: u32,
    pub timed: bool,
    pub time_remaining: u32,
    pub won: bool,
    pub history: Vec<Snapshot>,
    pub undos_remaining: u8,
    /// When the record was written. Informational only.
    pub saved_at: DateTime<Utc>,
}

impl SavedSession {
    /// Capture the persistable shape of a live session.
    pub fn from_session(session: &Session) -> Self {
        Self {
            board: *session.board(),
            score: session.score(),
            best_score: session.best_score(),
            timed: session.is_timed(),
            time_remaining: session.time_remaining(),
            won: session.won(),
            history: session.history().snapshots().copied().collect(),
            undos_remaining: session.undos_remaining(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild a live session from this record.
    pub fn into_session(self) -> Session {
        Session::restore(
            self.board,
            self.score,
            self.best_score,
            self.won,
            self.timed,
            self.time_remaining,
            self.undos_remaining,
            History::from_snapshots(self.history),
        )
    }

    /// Decode a stored record leniently.
    ///
    /// Returns `None` when `value` is not a JSON object at all. Otherwise
    /// every missing or ill-typed field falls back to its safe default:
    /// empty board, score 0, untimed, 300-second timer, 3 undos, empty
    /// history. Cell values that are not powers of two >= 2 load as
    /// empty cells.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let history: Vec<Snapshot> = obj
            .get("history")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(snapshot_from_value).collect())
            .unwrap_or_default();

        let saved_at = obj
            .get("savedAt")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Utc::now);

        Some(Self {
            board: board_from_value(obj.get("board")),
            score: u32_or(obj.get("score"), 0),
            best_score: u32_or(obj.get("bestScore"), 0),
            timed: obj.get("timed").and_then(Value::as_bool).unwrap_or(false),
            time_remaining: u32_or(obj.get("timeRemaining"), DEFAULT_TIME_LIMIT_SECS),
            won: obj.get("won").and_then(Value::as_bool).unwrap_or(false),
            history,
            undos_remaining: u32_or(obj.get("undosRemaining"), UNDO_BUDGET as u32)
                .min(UNDO_BUDGET as u32) as u8,
            saved_at,
        })
    }
}

fn u32_or(value: Option<&Value>, default: u32) -> u32 {
    value
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

fn cell_from_value(value: &Value) -> Option<u32> {
    let tile = value.as_u64().and_then(|n| u32::try_from(n).ok())?;
    // Only power-of-two tiles >= 2 are structurally valid.
    (tile >= 2 && tile.is_power_of_two()).then_some(tile)
}

fn board_from_value(value: Option<&Value>) -> Board {
    let mut board = Board::empty();
    let Some(rows) = value.and_then(Value::as_array) else {
        return board;
    };
    for (row, cells) in rows.iter().take(4).enumerate() {
        let Some(cells) = cells.as_array() else {
            continue;
        };
        for (col, cell) in cells.iter().take(4).enumerate() {
            board.set(row, col, cell_from_value(cell));
        }
    }
    board
}

fn snapshot_from_value(value: &Value) -> Snapshot {
    let obj = value.as_object();
    Snapshot {
        board: board_from_value(obj.and_then(|o| o.get("board"))),
        score: u32_or(obj.and_then(|o| o.get("score")), 0),
        time_remaining: u32_or(
            obj.and_then(|o| o.get("timeRemaining")),
            DEFAULT_TIME_LIMIT_SECS,
        ),
        timed: obj
            .and_then(|o| o.get("timed"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Durable storage for the single session record.
///
/// `load` is infallible by design: a missing, unreadable, or corrupt
/// record loads as `None` (or with per-field defaults), never as an
/// error the player sees.
pub trait SessionStore {
    /// Overwrite the stored record.
    fn save(&mut self, session: &SavedSession) -> Result<(), StoreError>;

    /// Read back the stored record, if present and decodable.
    fn load(&self) -> Option<SavedSession>;

    /// Remove the stored record. Clearing an empty slot is a no-op.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// File-backed store: one JSON file named [`STORAGE_KEY`] in a directory.
///
/// # Example
///
/// ```rust,no_run
/// use slide48::checkpoint::{FileStore, SessionStore};
///
/// let store = FileStore::new("/var/lib/slide48");
/// if let Some(saved) = store.load() {
///     let session = saved.into_session();
///     println!("resumed at score {}", session.score());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store the record as `dir/slide48.session.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_KEY),
        }
    }

    /// Full path of the storage slot.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn save(&mut self, session: &SavedSession) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Option<SavedSession> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => SavedSession::from_value(&value),
            Err(err) => {
                log::warn!("discarding unparseable session record: {err}");
                None
            }
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store holding the encoded record, for tests and headless
/// embedding. Goes through the same encode/decode path as [`FileStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored JSON, if any.
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Overwrite the raw slot, e.g. to simulate a corrupt record.
    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.slot = Some(raw.into());
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, session: &SavedSession) -> Result<(), StoreError> {
        self.slot = Some(serde_json::to_string(session)?);
        Ok(())
    }

    fn load(&self) -> Option<SavedSession> {
        let raw = self.slot.as_ref()?;
        let value = serde_json::from_str::<Value>(raw).ok()?;
        SavedSession::from_value(&value)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}
