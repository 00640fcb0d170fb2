use crate::SessionState;

/// Everything the presentation layer needs to paint one frame, derived from
/// [`crate::AppState::view`]. The collaborator never reads core internals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub session: SessionState,
    pub status_label: &'static str,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub line_count: u64,
    pub last_error: Option<String>,
    pub final_note: Option<String>,
}
