use std::path::PathBuf;

use crate::DownloadOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the form with the current inputs.
    StartClicked {
        url: String,
        output_dir: PathBuf,
        cookies: Option<PathBuf>,
    },
    /// User clicked Stop.
    StopClicked,
    /// One line of engine output.
    EngineLine(String),
    /// Terminal report for the active session.
    EngineDone(DownloadOutcome),
    /// Fallback for placeholder wiring.
    NoOp,
}
