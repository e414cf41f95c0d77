use crate::{AppState, Effect, ErrorKind, Msg, Phase, ProgressEvent, TerminalKind};

const STARTING_LINE: &str = "Starting extraction...";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputTypeChanged(input_type) => {
            if state.form().input_type == input_type {
                return (state, Vec::new());
            }
            let was_listing = state.form().wants_video_list();
            state.form_mut().input_type = input_type;
            sync_video_list(&mut state, was_listing)
        }
        Msg::RangeTypeChanged(range_type) => {
            // The range selector is disabled while anything is in flight.
            if !state.is_idle() || state.form().range_type == range_type {
                return (state, Vec::new());
            }
            let was_listing = state.form().wants_video_list();
            state.form_mut().range_type = range_type;
            sync_video_list(&mut state, was_listing)
        }
        Msg::UrlChanged(url) => {
            state.form_mut().url = url;
            Vec::new()
        }
        Msg::PlaylistNameChanged(name) => {
            state.form_mut().playlist_name = name;
            Vec::new()
        }
        Msg::StartIndexChanged(value) => {
            state.form_mut().start_index = value;
            Vec::new()
        }
        Msg::EndIndexChanged(value) => {
            state.form_mut().end_index = value;
            Vec::new()
        }
        Msg::RefreshListClicked => {
            if !state.is_idle() || !state.form().wants_video_list() {
                return (state, Vec::new());
            }
            request_video_list(&mut state)
        }
        Msg::PlaylistLoaded {
            total_videos,
            videos,
        } => {
            state.set_list_loading(false);
            // The table was hidden while the request was in flight.
            if state.form().wants_video_list() {
                state.playlist_mut().replace(total_videos, videos);
            }
            Vec::new()
        }
        Msg::PlaylistFailed(failure) => {
            state.set_list_loading(false);
            state.report(
                failure.kind,
                format!("Error fetching video list: {}", failure.message),
            );
            Vec::new()
        }
        Msg::RowToggled { index, checked } => {
            if !state.playlist().contains(index) {
                return (state, Vec::new());
            }
            state.playlist_mut().toggle_row(index, checked);
            Vec::new()
        }
        Msg::SelectAllToggled(checked) => {
            state.playlist_mut().toggle_all(checked);
            Vec::new()
        }
        Msg::SortClicked => {
            state.playlist_mut().toggle_sort();
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::AbortClicked => {
            if state.phase() == Phase::Idle {
                Vec::new()
            } else {
                vec![Effect::AbortExtraction]
            }
        }
        Msg::ExtractionAccepted => {
            if state.phase() == Phase::Submitting {
                state.set_phase(Phase::Streaming);
            }
            Vec::new()
        }
        Msg::ProgressReceived(event) => {
            if state.phase() == Phase::Idle {
                return (state, Vec::new());
            }
            if state.phase() == Phase::Submitting {
                state.set_phase(Phase::Streaming);
            }
            apply_event(&mut state, event);
            Vec::new()
        }
        Msg::ExtractionFinished(result) => {
            if state.phase() == Phase::Idle {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => state.progress_mut().complete(),
                Err(failure) => state.report(
                    failure.kind,
                    format!("Error during extraction: {}", failure.message),
                ),
            }
            state.set_phase(Phase::Idle);
            Vec::new()
        }
        Msg::ExtractionAborted => {
            if state.phase() == Phase::Idle {
                return (state, Vec::new());
            }
            state.append_log("Extraction aborted.");
            state.set_phase(Phase::Idle);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if !state.is_idle() {
        return Vec::new();
    }

    state.reset_progress(STARTING_LINE);
    let url = state.form().url.trim().to_string();
    if url.is_empty() {
        state.report(ErrorKind::Validation, "Please enter a URL.");
        return Vec::new();
    }

    let selection = state.playlist().collect_selection();
    let mut request = state.form().to_request(selection);
    request.url = url;
    state.set_phase(Phase::Submitting);
    vec![Effect::StartExtraction { request }]
}

fn apply_event(state: &mut AppState, event: ProgressEvent) {
    match event {
        ProgressEvent::Progress {
            current,
            total,
            message,
        } => state.progress_mut().apply(current, total, message),
        ProgressEvent::Terminal { kind, message } => match kind {
            TerminalKind::Failed => state.report(ErrorKind::Backend, message),
            TerminalKind::Malformed => state.report(ErrorKind::Decode, message),
            TerminalKind::Completed | TerminalKind::Other(_) => state.announce(message),
        },
    }
}

/// Fetches or drops the playlist table when the (playlist, specific) combination changes.
fn sync_video_list(state: &mut AppState, was_listing: bool) -> Vec<Effect> {
    match (was_listing, state.form().wants_video_list()) {
        (false, true) => request_video_list(state),
        (true, false) => {
            state.playlist_mut().clear();
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn request_video_list(state: &mut AppState) -> Vec<Effect> {
    if state.is_list_loading() {
        return Vec::new();
    }
    let url = state.form().url.trim().to_string();
    if url.is_empty() {
        state.report(ErrorKind::Validation, "Please enter a playlist URL.");
        return Vec::new();
    }
    state.set_list_loading(true);
    vec![Effect::ListPlaylistVideos { url }]
}
