//! Extractor engine: backend IO, progress-stream decoding and effect execution.
mod backend;
mod engine;
mod stream;
mod types;

pub use backend::{Backend, BackendSettings, ProgressSink, ReqwestBackend};
pub use engine::EngineHandle;
pub use stream::{decode_stream, StreamDecoder};
pub use types::{
    BackendError, EngineEvent, FailureKind, FetchVideosBody, InputKind, PlaylistListing,
    PlaylistVideo, ProgressEvent, RangeKind, TerminalKind,
};
