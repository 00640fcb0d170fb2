use std::process::{ExitStatus, Stdio};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, JobCompletion, JobFailure};

/// Drive one engine invocation to its terminal state and report it.
pub(crate) async fn run(
    args: Vec<String>,
    cancel: CancellationToken,
    slot: Arc<Mutex<Option<CancellationToken>>>,
    events: Sender<EngineEvent>,
) {
    let completion = execute(&args, &cancel, &events).await;
    // Release the slot before reporting, so a consumer reacting to the
    // completion event can start the next job without hitting Busy.
    *slot.lock().expect("job slot lock") = None;
    let _ = events.send(EngineEvent::Completed(completion));
}

async fn execute(
    args: &[String],
    cancel: &CancellationToken,
    events: &Sender<EngineEvent>,
) -> JobCompletion {
    let Some((program, rest)) = args.split_first() else {
        return JobCompletion::Failed(JobFailure::Spawn("empty argument list".to_string()));
    };

    let mut child = match Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return JobCompletion::Failed(JobFailure::Spawn(format!("{program} not found")));
        }
        Err(err) => return JobCompletion::Failed(JobFailure::Spawn(err.to_string())),
    };

    // Both pipes funnel into the same ordered channel. Each reader preserves
    // its stream's line order; the channel preserves send order.
    let out_task = tokio::spawn(relay_lines(child.stdout.take(), events.clone()));
    let err_task = tokio::spawn(relay_lines(child.stderr.take(), events.clone()));

    let status = tokio::select! {
        status = child.wait() => status,
        () = cancel.cancelled() => {
            request_stop(&mut child);
            // The stream stays open: partial output already produced keeps
            // flowing until the process exits on its own.
            child.wait().await
        }
    };

    let stdout_lines = join_relay(out_task).await;
    let stderr_lines = join_relay(err_task).await;

    let status = match status {
        Ok(status) => status,
        Err(err) => return JobCompletion::Failed(JobFailure::Io(err.to_string())),
    };
    let relayed = match (stdout_lines, stderr_lines) {
        (Ok(out), Ok(err)) => out + err,
        (Err(err), _) | (_, Err(err)) => {
            return JobCompletion::Failed(JobFailure::Io(err.to_string()))
        }
    };

    log::debug!("engine exited ({status}); {relayed} lines relayed");
    completion_from_status(status)
}

async fn relay_lines<R>(stream: Option<R>, events: Sender<EngineEvent>) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else { return Ok(0) };
    let mut lines = BufReader::new(stream).lines();
    let mut relayed = 0;
    while let Some(line) = lines.next_line().await? {
        relayed += 1;
        let _ = events.send(EngineEvent::Line(line));
    }
    Ok(relayed)
}

async fn join_relay(task: tokio::task::JoinHandle<std::io::Result<u64>>) -> std::io::Result<u64> {
    match task.await {
        Ok(result) => result,
        Err(err) => Err(std::io::Error::other(err)),
    }
}

/// Ask the child to stop without closing its output stream. Delivery
/// failures are logged and swallowed; cancellation is best-effort.
#[cfg(unix)]
fn request_stop(child: &mut Child) {
    use nix::errno::Errno;
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        // Already reaped; nothing to signal.
        return;
    };
    let pid = Pid::from_raw(pid as i32);
    match signal::kill(pid, Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(err) => {
            log::warn!("SIGTERM delivery failed ({err}); falling back to SIGINT");
            if let Err(err) = signal::kill(pid, Signal::SIGINT) {
                log::warn!("SIGINT delivery failed: {err}");
            }
        }
    }
}

/// No graceful signal on this platform; issue a terminate request instead.
#[cfg(not(unix))]
fn request_stop(child: &mut Child) {
    if child.id().is_none() {
        return;
    }
    if let Err(err) = child.start_kill() {
        log::warn!("terminate request failed: {err}");
    }
}

fn completion_from_status(status: ExitStatus) -> JobCompletion {
    match status.code() {
        Some(0) => JobCompletion::Success,
        Some(code) => JobCompletion::NonZeroExit(code),
        None => JobCompletion::NonZeroExit(signal_code(&status)),
    }
}

#[cfg(unix)]
fn signal_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map_or(-1, |signal| -signal)
}

#[cfg(not(unix))]
fn signal_code(_status: &ExitStatus) -> i32 {
    -1
}
