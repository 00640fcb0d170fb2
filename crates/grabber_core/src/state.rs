use std::fmt;

use crate::view_model::AppViewModel;

/// Lifecycle of the single download session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Working,
    Stopping,
}

/// Terminal report for a finished session, mirrored from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed,
    EngineExit(i32),
    Failed(String),
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadOutcome::Completed => write!(f, "✔ Done"),
            DownloadOutcome::EngineExit(code) => write!(f, "yt-dlp exited {code}"),
            DownloadOutcome::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    line_count: u64,
    last_error: Option<String>,
    last_outcome: Option<DownloadOutcome>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            status_label: match self.session {
                SessionState::Idle => "Idle",
                SessionState::Working => "Working…",
                SessionState::Stopping => "Stopping…",
            },
            start_enabled: self.session == SessionState::Idle,
            stop_enabled: self.session == SessionState::Working,
            line_count: self.line_count,
            last_error: self.last_error.clone(),
            final_note: self.last_outcome.as_ref().map(ToString::to_string),
        }
    }

    /// Returns the dirty flag and clears it; the render loop repaints only
    /// when this was set.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn begin_session(&mut self) {
        self.session = SessionState::Working;
        self.line_count = 0;
        self.last_error = None;
        self.last_outcome = None;
        self.dirty = true;
    }

    pub(crate) fn begin_stopping(&mut self) {
        self.session = SessionState::Stopping;
        self.dirty = true;
    }

    pub(crate) fn record_line(&mut self) {
        self.line_count += 1;
        self.dirty = true;
    }

    pub(crate) fn finish_session(&mut self, outcome: DownloadOutcome) {
        self.session = SessionState::Idle;
        self.last_outcome = Some(outcome);
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.dirty = true;
    }
}
