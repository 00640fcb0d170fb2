use std::time::Duration;

use grabber_engine::{EngineEvent, EventReceiver, JobCompletion, JobFailure, JobRunner, StartError};
use pretty_assertions::assert_eq;

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Long-running script that exits 7 on SIGTERM/SIGINT. `sleep` runs in the
/// background and the trap interrupts `wait`, so the reaction is immediate
/// under both dash and bash.
#[cfg(unix)]
const STOPPABLE: &str = "trap 'exit 7' TERM INT; echo started; sleep 30 & wait $!";

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

fn next_event(events: &EventReceiver) -> EngineEvent {
    events
        .recv_timeout(EVENT_TIMEOUT)
        .expect("event before timeout")
}

fn drain_until_completed(events: &EventReceiver) -> (Vec<String>, JobCompletion) {
    let mut lines = Vec::new();
    loop {
        match next_event(events) {
            EngineEvent::Line(line) => lines.push(line),
            EngineEvent::Completed(completion) => return (lines, completion),
        }
    }
}

#[cfg(unix)]
#[test]
fn relays_lines_in_order_then_reports_success_last() {
    let (runner, events) = JobRunner::new();
    runner.start(sh("printf 'one\\ntwo\\nthree\\n'")).unwrap();

    let (lines, completion) = drain_until_completed(&events);
    assert_eq!(lines, vec!["one", "two", "three"]);
    assert_eq!(completion, JobCompletion::Success);
    assert!(!runner.is_running());
}

#[cfg(unix)]
#[test]
fn trailing_carriage_returns_are_stripped() {
    let (runner, events) = JobRunner::new();
    runner.start(sh("printf 'windows line\\r\\n'")).unwrap();

    let (lines, _completion) = drain_until_completed(&events);
    assert_eq!(lines, vec!["windows line"]);
}

#[cfg(unix)]
#[test]
fn stderr_lines_reach_the_same_relay() {
    let (runner, events) = JobRunner::new();
    runner.start(sh("echo oops >&2; exit 1")).unwrap();

    let (lines, completion) = drain_until_completed(&events);
    assert_eq!(lines, vec!["oops"]);
    assert_eq!(completion, JobCompletion::NonZeroExit(1));
}

#[cfg(unix)]
#[test]
fn reports_the_engine_exit_code() {
    let (runner, events) = JobRunner::new();
    runner.start(sh("exit 5")).unwrap();

    let (lines, completion) = drain_until_completed(&events);
    assert!(lines.is_empty());
    assert_eq!(completion, JobCompletion::NonZeroExit(5));
}

#[test]
fn missing_executable_surfaces_as_a_spawn_failure_event() {
    let (runner, events) = JobRunner::new();
    runner
        .start(vec!["grabber-test-no-such-engine".to_string()])
        .unwrap();

    let (lines, completion) = drain_until_completed(&events);
    assert!(lines.is_empty());
    assert!(matches!(
        completion,
        JobCompletion::Failed(JobFailure::Spawn(_))
    ));
    // The slot is free again; the next start must not be rejected.
    assert!(!runner.is_running());
}

#[cfg(unix)]
#[test]
fn a_second_start_is_rejected_while_the_slot_is_taken() {
    let (runner, events) = JobRunner::new();
    runner.start(sh(STOPPABLE)).unwrap();
    assert_eq!(next_event(&events), EngineEvent::Line("started".to_string()));

    assert_eq!(runner.start(sh("echo nope")), Err(StartError::Busy));
    assert!(runner.is_running());

    runner.cancel();
    let (_lines, completion) = drain_until_completed(&events);
    assert_eq!(completion, JobCompletion::NonZeroExit(7));
}

#[cfg(unix)]
#[test]
fn cancel_terminates_the_job_and_completion_fires_exactly_once() {
    let (runner, events) = JobRunner::new();
    runner.start(sh(STOPPABLE)).unwrap();
    assert_eq!(next_event(&events), EngineEvent::Line("started".to_string()));

    runner.cancel();
    let (lines, completion) = drain_until_completed(&events);
    assert!(lines.is_empty());
    assert_eq!(completion, JobCompletion::NonZeroExit(7));

    // Exactly once: nothing further may arrive.
    assert_eq!(events.recv_timeout(Duration::from_millis(200)), None);
    assert!(!runner.is_running());
}

#[cfg(unix)]
#[test]
fn cancel_after_exit_is_a_noop() {
    let (runner, events) = JobRunner::new();
    runner.start(sh("true")).unwrap();
    let (_lines, completion) = drain_until_completed(&events);
    assert_eq!(completion, JobCompletion::Success);

    runner.cancel();
    assert_eq!(events.recv_timeout(Duration::from_millis(200)), None);
}

#[test]
fn cancel_with_no_job_is_a_noop() {
    let (runner, events) = JobRunner::new();
    runner.cancel();
    assert!(!runner.is_running());
    assert_eq!(events.recv_timeout(Duration::from_millis(100)), None);
}

#[cfg(unix)]
#[test]
fn the_slot_reopens_for_a_follow_up_job() {
    let (runner, events) = JobRunner::new();
    runner.start(sh("echo first")).unwrap();
    let (lines, completion) = drain_until_completed(&events);
    assert_eq!(lines, vec!["first"]);
    assert_eq!(completion, JobCompletion::Success);

    runner.start(sh("echo second")).unwrap();
    let (lines, completion) = drain_until_completed(&events);
    assert_eq!(lines, vec!["second"]);
    assert_eq!(completion, JobCompletion::Success);
}
