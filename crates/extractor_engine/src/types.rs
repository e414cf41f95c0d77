use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// One decoded record of a `/fetch_videos` response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Progress {
        current: Option<u64>,
        total: Option<u64>,
        message: String,
    },
    Terminal {
        kind: TerminalKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalKind {
    /// `status: "success"`.
    Completed,
    /// `status: "error"`.
    Failed,
    /// Any other or missing status.
    Other(String),
    /// The record was not a valid JSON object.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PlaylistListed(Result<PlaylistListing, BackendError>),
    /// Response headers arrived with a success status; the body follows.
    ExtractionAccepted,
    Progress(ProgressEvent),
    ExtractionFinished(Result<(), BackendError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistListing {
    pub total_videos: usize,
    pub videos: Vec<PlaylistVideo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistVideo {
    /// Sent either as a number or as a zero-padded string such as `"007"`.
    #[serde(deserialize_with = "deserialize_index")]
    pub index: u32,
    #[serde(default)]
    pub title: String,
}

/// Body of a `/list_playlist_videos` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_videos: Option<usize>,
    #[serde(default)]
    pub videos: Vec<PlaylistVideo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputKind {
    #[serde(rename = "video")]
    Single,
    #[serde(rename = "playlist")]
    Playlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    Entire,
    Specific,
}

/// JSON body posted to `/fetch_videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchVideosBody {
    pub input_type: InputKind,
    pub url: String,
    pub playlist_name: String,
    pub range_type: RangeKind,
    pub start_index: String,
    pub end_index: String,
    pub selected_indices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Network,
    /// Reading the response body failed part way.
    Stream,
    /// The backend reported `status: "error"`.
    Backend,
    /// A response body could not be parsed.
    Decode,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Stream => write!(f, "stream error"),
            FailureKind::Backend => write!(f, "backend error"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

fn deserialize_index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Number(u32),
        Text(String),
    }

    let index = match RawIndex::deserialize(deserializer)? {
        RawIndex::Number(value) => value,
        RawIndex::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("invalid video index '{text}'")))?,
    };
    if index == 0 {
        return Err(de::Error::custom("video index must be 1-based"));
    }
    Ok(index)
}
