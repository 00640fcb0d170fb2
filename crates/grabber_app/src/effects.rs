use std::sync::mpsc;
use std::thread;

use grabber_core::{build_command, DownloadOutcome, Effect, Msg};
use grabber_engine::{ensure_output_dir, EngineEvent, EventReceiver, JobCompletion, JobRunner};

/// Executes core effects against the engine and feeds engine events back
/// into the `Msg` channel: the bridge between the pure core and the world.
pub struct EffectRunner {
    runner: JobRunner,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(runner: JobRunner, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self { runner, msg_tx }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartDownload { spec } => {
                    if let Err(err) = ensure_output_dir(&spec.output_dir) {
                        // Unusable destination: close the session the way an
                        // engine fault would, without launching anything.
                        let _ = self
                            .msg_tx
                            .send(Msg::EngineDone(DownloadOutcome::Failed(err.to_string())));
                        continue;
                    }
                    let cmd = build_command(&spec);
                    println!("Running: {}", cmd.join(" "));
                    log::info!(
                        "starting download url={} dest={}",
                        spec.url,
                        spec.output_dir.display()
                    );
                    if let Err(err) = self.runner.start(cmd) {
                        // The core already guards the single slot; reaching
                        // this means core and engine state drifted apart.
                        log::warn!("start rejected by the engine: {err}");
                    }
                }
                Effect::CancelDownload => self.runner.cancel(),
            }
        }
    }
}

/// Forward engine events into the `Msg` channel. The pump is the sole
/// reader of the event relay; the presentation thread only ever sees Msgs,
/// in the order the job produced them.
pub fn spawn_event_pump(events: EventReceiver, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            let msg = match event {
                EngineEvent::Line(line) => Msg::EngineLine(line),
                EngineEvent::Completed(completion) => Msg::EngineDone(map_completion(completion)),
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_completion(completion: JobCompletion) -> DownloadOutcome {
    match completion {
        JobCompletion::Success => DownloadOutcome::Completed,
        JobCompletion::NonZeroExit(code) => DownloadOutcome::EngineExit(code),
        JobCompletion::Failed(failure) => DownloadOutcome::Failed(failure.to_string()),
    }
}
