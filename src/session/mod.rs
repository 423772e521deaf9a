//! Session state: sequences moves end-to-end and owns win, terminal,
//! timer, and undo-budget policy.
//!
//! A [`Session`] is an explicitly owned value; there is no ambient
//! global game. Operations are synchronous and atomic: each returns the
//! ordered [`SessionEvent`]s it produced, and an illegal operation
//! returns an empty vector having changed nothing.

mod event;

pub use event::{GameOverReason, SessionEvent};

use crate::core::{self, Board, Direction};
use crate::history::{History, Snapshot};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Undo budget granted to every new session. Never replenished.
pub const UNDO_BUDGET: u8 = 3;

/// Countdown used for timed sessions when no custom duration is given.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

/// Where a session sits in its lifecycle.
///
/// `Ended` is terminal: no further moves, undos, or ticks are accepted
/// until a new session replaces this one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Active,
    Ended(GameOverReason),
}

/// The authoritative state of one game.
///
/// # Example
///
/// ```rust
/// use slide48::session::Session;
/// use slide48::core::Direction;
///
/// let mut session = Session::start_seeded(false, None, 0, 42);
/// assert_eq!(session.board().count_empty(), 14);
/// assert_eq!(session.undos_remaining(), 3);
///
/// for direction in Direction::all() {
///     if !session.apply_direction(direction).is_empty() {
///         break;
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Session {
    board: Board,
    score: u32,
    best_score: u32,
    won: bool,
    timed: bool,
    time_remaining: u32,
    undos_remaining: u8,
    history: History,
    phase: Phase,
    rng: SmallRng,
}

impl Session {
    /// Start a fresh session: empty board with two spawned tiles, full
    /// undo budget, and the given best score carried over from earlier
    /// sessions. `custom_seconds` overrides the default countdown and is
    /// ignored for untimed sessions.
    pub fn start(timed: bool, custom_seconds: Option<u32>, best_score: u32) -> Self {
        Self::with_rng(timed, custom_seconds, best_score, SmallRng::from_entropy())
    }

    /// Like [`Session::start`] but seeded, for reproducible games.
    pub fn start_seeded(timed: bool, custom_seconds: Option<u32>, best_score: u32, seed: u64) -> Self {
        Self::with_rng(
            timed,
            custom_seconds,
            best_score,
            SmallRng::seed_from_u64(seed),
        )
    }

    fn with_rng(timed: bool, custom_seconds: Option<u32>, best_score: u32, mut rng: SmallRng) -> Self {
        let mut board = Board::empty();
        board.spawn_tile(&mut rng);
        board.spawn_tile(&mut rng);

        let time_remaining = if timed {
            custom_seconds
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_TIME_LIMIT_SECS)
        } else {
            0
        };

        Self {
            board,
            score: 0,
            best_score,
            won: false,
            timed,
            time_remaining,
            undos_remaining: UNDO_BUDGET,
            history: History::new(),
            phase: Phase::Active,
            rng,
        }
    }

    /// Rebuild a session from restored state, e.g. a loaded checkpoint.
    /// RNG state is not part of the persisted record, so the resumed
    /// session draws from fresh entropy.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        board: Board,
        score: u32,
        best_score: u32,
        won: bool,
        timed: bool,
        time_remaining: u32,
        undos_remaining: u8,
        history: History,
    ) -> Self {
        Self {
            board,
            score,
            best_score: best_score.max(score),
            won,
            timed,
            time_remaining,
            undos_remaining: undos_remaining.min(UNDO_BUDGET),
            history,
            phase: Phase::Active,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Sticky for the remainder of the session once set.
    pub fn won(&self) -> bool {
        self.won
    }

    pub fn is_timed(&self) -> bool {
        self.timed
    }

    /// Seconds left on the countdown; 0 for untimed sessions.
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn undos_remaining(&self) -> u8 {
        self.undos_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    /// Whether an undo would currently succeed.
    pub fn can_undo(&self) -> bool {
        !self.is_ended() && self.undos_remaining > 0 && !self.history.is_empty()
    }

    /// The retained pre-move snapshots, oldest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
            time_remaining: self.time_remaining,
            timed: self.timed,
        }
    }

    /// Apply one directional move end-to-end.
    ///
    /// A move that would not change the board is illegal and a complete
    /// no-op: no snapshot is kept, no tile spawns, no score changes, and
    /// the returned event list is empty. A legal move commits the
    /// pre-move snapshot to history, applies score and win policy,
    /// spawns exactly one tile, and checks for the board-full terminal
    /// condition.
    pub fn apply_direction(&mut self, direction: Direction) -> Vec<SessionEvent> {
        if self.is_ended() {
            return Vec::new();
        }

        let snapshot = self.snapshot();
        let outcome = core::apply_move(&self.board, direction);
        if !outcome.changed {
            return Vec::new();
        }

        let mut events = Vec::new();
        let previous = self.board;

        self.history.push(snapshot);
        self.board = outcome.board;

        if outcome.score_delta > 0 {
            self.score += outcome.score_delta;
            if self.score > self.best_score {
                self.best_score = self.score;
            }
            events.push(SessionEvent::ScoreChanged {
                score: self.score,
                best_score: self.best_score,
            });
        }

        if outcome.won && !self.won {
            self.won = true;
            events.push(SessionEvent::Won);
        }

        self.board.spawn_tile(&mut self.rng);

        events.push(SessionEvent::BoardChanged {
            board: self.board,
            previous,
        });

        if self.board.is_terminal() {
            self.phase = Phase::Ended(GameOverReason::BoardFull);
            events.push(SessionEvent::GameOver {
                reason: GameOverReason::BoardFull,
            });
        }

        events.push(self.undo_availability());
        events
    }

    /// Advance a timed session's countdown by one second.
    ///
    /// No-op for untimed or already-ended sessions, so a scheduler may
    /// keep ticking after expiry without effect. Reaching zero ends the
    /// session with [`GameOverReason::TimeExpired`] exactly once; an
    /// already-earned win flag is left untouched.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        if !self.timed || self.is_ended() || self.time_remaining == 0 {
            return Vec::new();
        }

        self.time_remaining -= 1;
        let mut events = vec![SessionEvent::TimerTick {
            seconds_remaining: self.time_remaining,
        }];

        if self.time_remaining == 0 {
            self.phase = Phase::Ended(GameOverReason::TimeExpired);
            events.push(SessionEvent::GameOver {
                reason: GameOverReason::TimeExpired,
            });
        }

        events
    }

    /// Restore the most recent pre-move snapshot.
    ///
    /// A no-op (empty event list) when the session has ended, the
    /// per-session budget is spent, or no snapshot is retained. A
    /// successful undo restores board and score, restores the countdown
    /// when the snapshot was timed, and spends one undo. The win flag is
    /// deliberately not restored: a win earned before the undone move
    /// stays won.
    pub fn undo(&mut self) -> Vec<SessionEvent> {
        if !self.can_undo() {
            return Vec::new();
        }
        let snapshot = match self.history.pop() {
            Some(snapshot) => snapshot,
            None => return Vec::new(),
        };

        let previous = self.board;
        self.board = snapshot.board;
        self.score = snapshot.score;
        if snapshot.timed {
            self.time_remaining = snapshot.time_remaining;
        }
        self.undos_remaining -= 1;

        vec![
            SessionEvent::BoardChanged {
                board: self.board,
                previous,
            },
            SessionEvent::ScoreChanged {
                score: self.score,
                best_score: self.best_score,
            },
            self.undo_availability(),
        ]
    }

    fn undo_availability(&self) -> SessionEvent {
        SessionEvent::UndoAvailabilityChanged {
            undos_remaining: self.undos_remaining,
            can_undo: self.can_undo(),
        }
    }
}
