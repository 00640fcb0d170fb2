use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::job;
use crate::{EngineEvent, JobCompletion, JobFailure, StartError};

enum RunnerCommand {
    Run {
        args: Vec<String>,
        cancel: CancellationToken,
    },
}

/// Owns the single job slot. At most one engine invocation is live at a
/// time: `start` claims the slot synchronously, the job runs on a background
/// tokio runtime, and everything it produces comes back through the event
/// channel handed out by [`JobRunner::new`].
pub struct JobRunner {
    slot: Arc<Mutex<Option<CancellationToken>>>,
    cmd_tx: mpsc::Sender<RunnerCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl JobRunner {
    pub fn new() -> (Self, EventReceiver) {
        let (event_tx, event_rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel::<RunnerCommand>();
        let slot: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));

        let thread_slot = Arc::clone(&slot);
        let thread_events = event_tx.clone();
        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(RunnerCommand::Run { args, cancel }) = cmd_rx.recv() {
                let slot = Arc::clone(&thread_slot);
                let events = thread_events.clone();
                runtime.spawn(async move {
                    job::run(args, cancel, slot, events).await;
                });
            }
        });

        (
            Self {
                slot,
                cmd_tx,
                event_tx,
            },
            EventReceiver { rx: event_rx },
        )
    }

    /// Claim the job slot and launch `args` on the background runtime. The
    /// only synchronous error is a busy slot; launch failures arrive as a
    /// completion event like any other background fault.
    pub fn start(&self, args: Vec<String>) -> Result<(), StartError> {
        let mut slot = self.slot.lock().expect("job slot lock");
        if slot.is_some() {
            return Err(StartError::Busy);
        }
        let cancel = CancellationToken::new();
        *slot = Some(cancel.clone());
        drop(slot);

        if self.cmd_tx.send(RunnerCommand::Run { args, cancel }).is_err() {
            // Runner thread is gone. Release the slot and report through the
            // same channel a background fault would use.
            *self.slot.lock().expect("job slot lock") = None;
            let _ = self.event_tx.send(EngineEvent::Completed(JobCompletion::Failed(
                JobFailure::Io("job runner thread terminated".to_string()),
            )));
        }
        Ok(())
    }

    /// Request graceful termination of the running job. A no-op when the
    /// slot is empty or the process has already exited; never blocks and
    /// never fails.
    pub fn cancel(&self) {
        if let Some(cancel) = self.slot.lock().expect("job slot lock").as_ref() {
            cancel.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot.lock().expect("job slot lock").is_some()
    }
}

/// Consumer end of the event relay. The presentation thread drains this on
/// its own loop; events arrive in the order the job produced them, with the
/// completion event strictly last.
pub struct EventReceiver {
    rx: mpsc::Receiver<EngineEvent>,
}

impl EventReceiver {
    /// Blocks until the next event. `None` once the runner is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}
