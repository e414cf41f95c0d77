use crate::ExtractionRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListPlaylistVideos { url: String },
    StartExtraction { request: ExtractionRequest },
    AbortExtraction,
}
