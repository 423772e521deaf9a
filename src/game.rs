//! Imperative shell: wires the session to storage and observers.
//!
//! [`Game`] owns the single active [`Session`] and the storage slot. It
//! forwards every [`SessionEvent`] to an [`Observer`], persists
//! best-effort after each state change, and clears the slot when a
//! session ends without a win (a lost or timed-out game is never
//! resumable).

use crate::checkpoint::{SavedSession, SessionStore};
use crate::core::{Board, Direction};
use crate::session::{GameOverReason, Session, SessionEvent};

/// Callbacks consumed by the rendering/feedback layer. All methods are
/// no-ops by default; the core never depends on what they do.
pub trait Observer {
    /// `previous` lets the observer detect which cells doubled.
    fn on_board_changed(&mut self, board: &Board, previous: &Board) {
        let _ = (board, previous);
    }

    fn on_score_changed(&mut self, score: u32, best_score: u32) {
        let _ = (score, best_score);
    }

    fn on_win(&mut self) {}

    fn on_game_over(&mut self, reason: GameOverReason) {
        let _ = reason;
    }

    fn on_timer_tick(&mut self, seconds_remaining: u32) {
        let _ = seconds_remaining;
    }

    fn on_undo_availability_changed(&mut self, undos_remaining: u8, can_undo: bool) {
        let _ = (undos_remaining, can_undo);
    }
}

/// Owns the active session, the durable storage slot, and the
/// process-wide best score.
///
/// # Example
///
/// ```rust
/// use slide48::core::Direction;
/// use slide48::checkpoint::MemoryStore;
/// use slide48::game::{Game, Observer};
///
/// struct Silent;
/// impl Observer for Silent {}
///
/// let mut game = Game::new(MemoryStore::new());
/// game.start_session(false, None, &mut Silent);
/// game.apply_direction(Direction::Left, &mut Silent);
/// ```
pub struct Game<S: SessionStore> {
    session: Option<Session>,
    store: S,
    best_score: u32,
}

impl<S: SessionStore> Game<S> {
    /// Create a game around a storage slot. The best score is seeded
    /// from any record already in the store.
    pub fn new(store: S) -> Self {
        let best_score = store.load().map(|saved| saved.best_score).unwrap_or(0);
        Self {
            session: None,
            store,
            best_score,
        }
    }

    /// The active session, if one is running.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Best score across all sessions this process has seen.
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Abandon any active session and start a fresh one. The previous
    /// session's record is removed; only the best score carries over.
    pub fn start_session(
        &mut self,
        timed: bool,
        custom_seconds: Option<u32>,
        observer: &mut dyn Observer,
    ) {
        self.clear_session();
        let session = Session::start(timed, custom_seconds, self.best_score);

        let board = *session.board();
        observer.on_board_changed(&board, &Board::empty());
        observer.on_score_changed(session.score(), session.best_score());
        observer.on_undo_availability_changed(session.undos_remaining(), session.can_undo());
        if session.is_timed() {
            observer.on_timer_tick(session.time_remaining());
        }

        self.session = Some(session);
        self.persist();
    }

    /// Resume the stored session, if any. Returns whether a session was
    /// restored; observers are replayed the current board, score, undo
    /// availability, and countdown so the view can catch up.
    pub fn resume_session(&mut self, observer: &mut dyn Observer) -> bool {
        let Some(saved) = self.store.load() else {
            return false;
        };
        let session = saved.into_session();
        self.best_score = self.best_score.max(session.best_score());

        let board = *session.board();
        observer.on_board_changed(&board, &board);
        observer.on_score_changed(session.score(), session.best_score());
        observer.on_undo_availability_changed(session.undos_remaining(), session.can_undo());
        if session.is_timed() {
            observer.on_timer_tick(session.time_remaining());
        }

        self.session = Some(session);
        true
    }

    /// Drop the active session and its stored record.
    pub fn clear_session(&mut self) {
        self.session = None;
        if let Err(err) = self.store.clear() {
            log::warn!("failed to clear session record: {err}");
        }
    }

    /// Route one directional input to the session.
    pub fn apply_direction(&mut self, direction: Direction, observer: &mut dyn Observer) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.apply_direction(direction);
        if events.is_empty() {
            // Illegal move: nothing changed, nothing to persist or report.
            return;
        }
        self.best_score = self.best_score.max(session.best_score());
        self.after_change(&events, observer);
    }

    /// Route one undo request to the session.
    pub fn undo(&mut self, observer: &mut dyn Observer) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.undo();
        if events.is_empty() {
            return;
        }
        self.after_change(&events, observer);
    }

    /// Advance the countdown of a timed session by one second.
    pub fn tick(&mut self, observer: &mut dyn Observer) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.tick();
        if events.is_empty() {
            return;
        }
        self.after_change(&events, observer);
    }

    fn after_change(&mut self, events: &[SessionEvent], observer: &mut dyn Observer) {
        self.persist();
        for event in events {
            dispatch(event, observer);
        }

        let ended_without_win = events
            .iter()
            .any(|e| matches!(e, SessionEvent::GameOver { .. }))
            && !self.session.as_ref().map(Session::won).unwrap_or(false);
        if ended_without_win {
            // A lost or timed-out session is never resumable.
            if let Err(err) = self.store.clear() {
                log::warn!("failed to clear ended session record: {err}");
            }
        }
    }

    fn persist(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let saved = SavedSession::from_session(session);
        if let Err(err) = self.store.save(&saved) {
            log::warn!("failed to persist session: {err}");
        }
    }
}

fn dispatch(event: &SessionEvent, observer: &mut dyn Observer) {
    match event {
        SessionEvent::BoardChanged { board, previous } => {
            observer.on_board_changed(board, previous)
        }
        SessionEvent::ScoreChanged { score, best_score } => {
            observer.on_score_changed(*score, *best_score)
        }
        SessionEvent::Won => observer.on_win(),
        SessionEvent::GameOver { reason } => observer.on_game_over(*reason),
        SessionEvent::TimerTick { seconds_remaining } => {
            observer.on_timer_tick(*seconds_remaining)
        }
        SessionEvent::UndoAvailabilityChanged {
            undos_remaining,
            can_undo,
        } => observer.on_undo_availability_changed(*undos_remaining, *can_undo),
    }
}
