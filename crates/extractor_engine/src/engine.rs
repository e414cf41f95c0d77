use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use extractor_logging::{ext_debug, ext_warn};
use tokio_util::sync::CancellationToken;

use crate::backend::{Backend, BackendSettings, ChannelProgressSink, ProgressSink, ReqwestBackend};
use crate::{EngineEvent, FetchVideosBody};

enum EngineCommand {
    ListPlaylist {
        url: String,
    },
    Extract {
        body: FetchVideosBody,
        cancel: CancellationToken,
    },
}

/// Runs backend requests on a background runtime and reports `EngineEvent`s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    active: Mutex<Option<CancellationToken>>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> io::Result<Self> {
        let backend = ReqwestBackend::new(settings).map_err(io::Error::other)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("extractor-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), command, event_tx).await;
                    });
                }
                ext_debug!("engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            active: Mutex::new(None),
        })
    }

    pub fn list_playlist(&self, url: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ListPlaylist { url: url.into() });
    }

    pub fn extract(&self, body: FetchVideosBody) {
        let cancel = CancellationToken::new();
        match self.active.lock() {
            Ok(mut active) => *active = Some(cancel.clone()),
            Err(_) => ext_warn!("abort token lock poisoned; extraction cannot be aborted"),
        }
        let _ = self.cmd_tx.send(EngineCommand::Extract { body, cancel });
    }

    /// Cancels the running extraction between chunk reads. No-op when idle.
    pub fn abort(&self) {
        if let Ok(mut active) = self.active.lock() {
            if let Some(token) = active.take() {
                token.cancel();
            }
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::ListPlaylist { url } => {
            let result = backend.list_playlist_videos(&url).await;
            let _ = event_tx.send(EngineEvent::PlaylistListed(result));
        }
        EngineCommand::Extract { body, cancel } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = backend.fetch_videos(&body, &sink, &cancel).await;
            sink.emit(EngineEvent::ExtractionFinished(result));
        }
    }
}
