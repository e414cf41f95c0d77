use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use extractor_core::{
    Effect, ErrorKind, ExtractionRequest, Failure, InputType, Msg, ProgressEvent, RangeType,
    TerminalKind, VideoEntry,
};
use extractor_engine::{
    BackendError, EngineEvent, EngineHandle, FailureKind, FetchVideosBody, InputKind, RangeKind,
};
use extractor_logging::{ext_debug, ext_info, ext_warn};

use super::app::AppInput;

/// Turns core effects into engine calls and engine events back into messages.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
}

impl EffectRunner {
    pub fn new(engine: Arc<EngineHandle>, input_tx: mpsc::Sender<AppInput>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(input_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ListPlaylistVideos { url } => {
                    ext_info!("ListPlaylistVideos url_len={} url={}", url.len(), url);
                    self.engine.list_playlist(url);
                }
                Effect::StartExtraction { request } => {
                    ext_info!(
                        "StartExtraction input_type={:?} range_type={:?} selected={}",
                        request.input_type,
                        request.range_type,
                        request.selected_indices.len()
                    );
                    self.engine.extract(to_body(request));
                }
                Effect::AbortExtraction => {
                    ext_info!("AbortExtraction");
                    self.engine.abort();
                }
            }
        }
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<AppInput>) {
        let engine = self.engine.clone();
        let spawned = thread::Builder::new()
            .name("extractor-events".to_string())
            .spawn(move || loop {
                let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                    continue;
                };
                if input_tx.send(AppInput::Engine(map_event(event))).is_err() {
                    ext_debug!("event forwarding stopped; controller is gone");
                    break;
                }
            });
        if let Err(err) = spawned {
            ext_warn!("could not start event forwarding thread: {}", err);
        }
    }
}

pub(crate) fn to_body(request: ExtractionRequest) -> FetchVideosBody {
    FetchVideosBody {
        input_type: match request.input_type {
            InputType::Single => InputKind::Single,
            InputType::Playlist => InputKind::Playlist,
        },
        url: request.url,
        playlist_name: request.playlist_name,
        range_type: match request.range_type {
            RangeType::Entire => RangeKind::Entire,
            RangeType::Specific => RangeKind::Specific,
        },
        start_index: request.start_index,
        end_index: request.end_index,
        selected_indices: request.selected_indices,
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PlaylistListed(Ok(listing)) => Msg::PlaylistLoaded {
            total_videos: listing.total_videos,
            videos: listing
                .videos
                .into_iter()
                .map(|video| VideoEntry {
                    index: video.index,
                    title: video.title,
                })
                .collect(),
        },
        EngineEvent::PlaylistListed(Err(err)) => {
            ext_warn!("Playlist listing failed: {}", err);
            Msg::PlaylistFailed(map_failure(err))
        }
        EngineEvent::ExtractionAccepted => Msg::ExtractionAccepted,
        EngineEvent::Progress(progress) => Msg::ProgressReceived(map_progress(progress)),
        EngineEvent::ExtractionFinished(Ok(())) => Msg::ExtractionFinished(Ok(())),
        EngineEvent::ExtractionFinished(Err(err)) if err.kind == FailureKind::Cancelled => {
            Msg::ExtractionAborted
        }
        EngineEvent::ExtractionFinished(Err(err)) => {
            ext_warn!("Extraction failed: {}", err);
            Msg::ExtractionFinished(Err(map_failure(err)))
        }
    }
}

fn map_progress(progress: extractor_engine::ProgressEvent) -> ProgressEvent {
    match progress {
        extractor_engine::ProgressEvent::Progress {
            current,
            total,
            message,
        } => ProgressEvent::Progress {
            current,
            total,
            message,
        },
        extractor_engine::ProgressEvent::Terminal { kind, message } => ProgressEvent::Terminal {
            kind: match kind {
                extractor_engine::TerminalKind::Completed => TerminalKind::Completed,
                extractor_engine::TerminalKind::Failed => TerminalKind::Failed,
                extractor_engine::TerminalKind::Other(status) => TerminalKind::Other(status),
                extractor_engine::TerminalKind::Malformed => TerminalKind::Malformed,
            },
            message,
        },
    }
}

fn map_failure(err: BackendError) -> Failure {
    let kind = match err.kind {
        FailureKind::InvalidUrl | FailureKind::HttpStatus(_) | FailureKind::Network => {
            ErrorKind::Transport
        }
        FailureKind::Stream => ErrorKind::Stream,
        FailureKind::Backend => ErrorKind::Backend,
        FailureKind::Decode => ErrorKind::Decode,
        // Only reached for listings; extraction aborts are mapped above.
        FailureKind::Cancelled => ErrorKind::Transport,
    };
    Failure::new(kind, err.message)
}
