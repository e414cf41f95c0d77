//! Extractor core: pure extraction state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod playlist;
mod progress;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{ErrorKind, Failure, Notification, NotificationKind};
pub use msg::{Msg, ProgressEvent, TerminalKind};
pub use playlist::{PlaylistSelector, SortDirection, VideoEntry};
pub use progress::{ProgressTracker, RECENT_PROGRESS_LIMIT};
pub use request::{ExtractionRequest, FormState, InputType, RangeType};
pub use state::{AppState, Phase};
pub use update::update;
pub use view_model::{AppViewModel, ControlsView, VideoRowView};
