//! Grabber engine: subprocess lifecycle and the cross-thread event relay.
mod job;
mod persist;
mod runner;
mod types;

pub use persist::{ensure_output_dir, PersistError};
pub use runner::{EventReceiver, JobRunner};
pub use types::{EngineEvent, JobCompletion, JobFailure, StartError};
