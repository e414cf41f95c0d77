use std::time::Duration;

use extractor_logging::{ext_debug, ext_info, ext_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::stream::decode_stream;
use crate::types::ListResponse;
use crate::{BackendError, EngineEvent, FailureKind, FetchVideosBody, PlaylistListing};

const LIST_PATH: &str = "list_playlist_videos";
const FETCH_PATH: &str = "fetch_videos";
const DIAGNOSTIC_BODY_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    /// Only connection setup is bounded; a stalled stream waits indefinitely.
    pub connect_timeout: Duration,
}

impl BackendSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub(crate) struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn list_playlist_videos(&self, url: &str) -> Result<PlaylistListing, BackendError>;

    /// Issues the extraction request and emits `ExtractionAccepted` followed by
    /// one `Progress` per decoded record. Returns once the body is exhausted.
    async fn fetch_videos(
        &self,
        body: &FetchVideosBody,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, BackendError> {
        let endpoint = self.endpoint(path)?;
        ext_debug!("POST {} ({} bytes)", endpoint, body.len());
        self.client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn list_playlist_videos(&self, url: &str) -> Result<PlaylistListing, BackendError> {
        let body = serde_json::to_vec(&serde_json::json!({ "url": url }))
            .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))?;
        let response = self.post_json(LIST_PATH, body).await?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed = serde_json::from_slice::<ListResponse>(&bytes);

        if !status.is_success() {
            // The backend explains most rejections in an error payload.
            if let Ok(ListResponse {
                message: Some(message),
                ..
            }) = parsed
            {
                return Err(BackendError::new(FailureKind::Backend, message));
            }
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("HTTP error! Status: {}", status.as_u16()),
            ));
        }

        let response = parsed.map_err(|err| {
            BackendError::new(
                FailureKind::Decode,
                format!("invalid playlist listing: {err}"),
            )
        })?;
        if response.status == "error" {
            return Err(BackendError::new(
                FailureKind::Backend,
                response
                    .message
                    .unwrap_or_else(|| "Failed to retrieve playlist information.".to_string()),
            ));
        }

        let total_videos = response.total_videos.unwrap_or(response.videos.len());
        ext_info!("listed {} videos for {}", total_videos, url);
        Ok(PlaylistListing {
            total_videos,
            videos: response.videos,
        })
    }

    async fn fetch_videos(
        &self,
        body: &FetchVideosBody,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), BackendError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))?;
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(BackendError::new(FailureKind::Cancelled, "extraction aborted"));
            }
            response = self.post_json(FETCH_PATH, payload) => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    ext_warn!("could not read body of rejected extraction: {}", err);
                    String::new()
                }
            };
            let excerpt: String = text.chars().take(DIAGNOSTIC_BODY_CHARS).collect();
            ext_warn!("extraction request rejected with status {}", status);
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!(
                    "HTTP error! Status: {}, Response: {}...",
                    status.as_u16(),
                    excerpt
                ),
            ));
        }

        ext_info!("extraction accepted for {}", body.url);
        sink.emit(EngineEvent::ExtractionAccepted);

        let events = decode_stream(response.bytes_stream());
        futures_util::pin_mut!(events);
        let mut records = 0usize;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    ext_info!("extraction aborted after {} records", records);
                    return Err(BackendError::new(FailureKind::Cancelled, "extraction aborted"));
                }
                next = events.next() => next,
            };
            match next {
                Some(Ok(event)) => {
                    records += 1;
                    sink.emit(EngineEvent::Progress(event));
                }
                Some(Err(err)) => {
                    return Err(BackendError::new(FailureKind::Stream, err.to_string()));
                }
                None => break,
            }
        }

        ext_info!("extraction stream ended after {} records", records);
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_builder() {
        return BackendError::new(FailureKind::InvalidUrl, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
