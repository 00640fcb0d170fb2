use thiserror::Error;

/// What a job emits, in order: any number of `Line`s, then exactly one
/// `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Line(String),
    Completed(JobCompletion),
}

/// Terminal status of one engine invocation. A signal death has no exit
/// code and is reported as the negated signal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCompletion {
    Success,
    NonZeroExit(i32),
    Failed(JobFailure),
}

/// Faults caught inside the background job. These travel in the completion
/// event; nothing is raised across the thread boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobFailure {
    #[error("engine could not be launched: {0}")]
    Spawn(String),
    #[error("i/o failure while reading engine output: {0}")]
    Io(String),
}

/// Synchronous rejection from [`crate::JobRunner::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("a download job is already running")]
    Busy,
}
