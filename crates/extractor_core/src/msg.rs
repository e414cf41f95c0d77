use crate::{Failure, InputType, RangeType, VideoEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User switched between single video and playlist input.
    InputTypeChanged(InputType),
    /// User edited the URL field.
    UrlChanged(String),
    /// User edited the playlist name field.
    PlaylistNameChanged(String),
    /// User switched between entire playlist and a specific range.
    RangeTypeChanged(RangeType),
    StartIndexChanged(String),
    EndIndexChanged(String),
    /// User asked for the playlist contents to be fetched again.
    RefreshListClicked,
    /// Backend returned the playlist contents.
    PlaylistLoaded {
        total_videos: usize,
        videos: Vec<VideoEntry>,
    },
    /// Listing the playlist failed.
    PlaylistFailed(Failure),
    /// User ticked or cleared a single row.
    RowToggled { index: u32, checked: bool },
    /// User ticked or cleared "select all".
    SelectAllToggled(bool),
    /// User clicked the index column header.
    SortClicked,
    /// User clicked Start Extraction.
    SubmitClicked,
    /// User asked to stop the running extraction.
    AbortClicked,
    /// Backend accepted the extraction request and the body is streaming.
    ExtractionAccepted,
    /// One decoded record of the progress stream.
    ProgressReceived(ProgressEvent),
    /// Stream ended normally (`Ok`) or the request failed.
    ExtractionFinished(Result<(), Failure>),
    /// Stream consumption stopped after an abort.
    ExtractionAborted,
}

/// A decoded progress record, as seen by the controller.
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
    Completed,
    Failed,
    Other(String),
    Malformed,
}
