//! Command-line presentation collaborator for the grabber core and engine.
//!
//! A GUI shell would wire the exact same pieces: a `Msg` channel drained on
//! one thread, the pure `update` function, and the effect runner. Here the
//! log view is stdout and the Stop button is Ctrl+C.

mod effects;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use grabber_core::{update, AppState, DownloadOutcome, Msg, SessionState};
use grabber_engine::JobRunner;

use crate::effects::EffectRunner;

/// Download a playlist with yt-dlp, streaming its log to the terminal.
#[derive(Debug, Parser)]
#[command(name = "grabber", version)]
struct Args {
    /// Playlist URL to download.
    url: String,

    /// Destination folder; created if missing.
    #[arg(default_value = ".")]
    output_dir: PathBuf,

    /// Netscape-format cookies file for private or age-gated playlists.
    #[arg(long, value_name = "FILE")]
    cookies: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::initialize(logging::LogDestination::File);
    let args = Args::parse();

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let (runner, events) = JobRunner::new();
    let effect_runner = EffectRunner::new(runner, msg_tx.clone());
    effects::spawn_event_pump(events, msg_tx.clone());

    // Ctrl+C plays the Stop button: graceful cancellation, with the relay
    // running until the engine actually exits.
    let stop_tx = msg_tx.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        let _ = stop_tx.send(Msg::StopClicked);
    }) {
        log::warn!("Ctrl+C handler unavailable: {err}");
    }

    let _ = msg_tx.send(Msg::StartClicked {
        url: args.url,
        output_dir: args.output_dir,
        cookies: args.cookies,
    });

    let mut state = AppState::new();
    let mut succeeded = false;
    let mut last_status = "";
    while let Ok(msg) = msg_rx.recv() {
        if let Msg::EngineLine(line) = &msg {
            println!("{line}");
        }
        if let Msg::EngineDone(outcome) = &msg {
            succeeded = *outcome == DownloadOutcome::Completed;
        }

        let (next, effects) = update(state, msg);
        state = next;
        effect_runner.enqueue(effects);

        if state.consume_dirty() {
            let view = state.view();
            if let Some(error) = &view.last_error {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
            if view.status_label != last_status {
                log::info!("status: {}", view.status_label);
                last_status = view.status_label;
            }
            if view.session == SessionState::Idle {
                if let Some(note) = &view.final_note {
                    println!("{note}");
                }
                break;
            }
        }
    }

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
