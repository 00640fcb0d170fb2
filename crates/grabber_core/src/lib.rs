//! Grabber core: pure session state machine and command construction.
mod command;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use command::{
    build_command, DownloadSpec, ARCHIVE_FILENAME, CONCURRENT_FRAGMENTS, ENGINE_BIN,
    OUTPUT_TEMPLATE,
};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, DownloadOutcome, SessionState};
pub use update::update;
pub use view_model::AppViewModel;
