use crate::{AppState, DownloadSpec, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked {
            url,
            output_dir,
            cookies,
        } => {
            if state.session() != SessionState::Idle {
                // Single job slot: Start is inert while a session is live.
                Vec::new()
            } else {
                let url = url.trim().to_string();
                if url.is_empty() {
                    state.set_error("Enter a playlist URL");
                    Vec::new()
                } else {
                    state.begin_session();
                    vec![Effect::StartDownload {
                        spec: DownloadSpec::new(url, output_dir, cookies),
                    }]
                }
            }
        }
        Msg::StopClicked => {
            if state.session() == SessionState::Working {
                state.begin_stopping();
                vec![Effect::CancelDownload]
            } else {
                Vec::new()
            }
        }
        Msg::EngineLine(_) => {
            state.record_line();
            Vec::new()
        }
        Msg::EngineDone(outcome) => {
            state.finish_session(outcome);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
