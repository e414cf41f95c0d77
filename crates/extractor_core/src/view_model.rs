use crate::{FormState, Phase, SortDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsView {
    pub submit_enabled: bool,
    pub range_type_enabled: bool,
    pub abort_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub form: FormState,
    pub controls: ControlsView,
    pub show_playlist_options: bool,
    pub show_range_options: bool,
    pub list_loading: bool,
    pub summary: Option<String>,
    pub rows: Vec<VideoRowView>,
    pub all_selected: bool,
    /// `None` while the table shows backend order.
    pub sort: Option<SortDirection>,
    /// 0 to 100.
    pub progress_percent: f64,
    /// Newest first, at most five entries.
    pub recent_progress: Vec<String>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRowView {
    pub index: u32,
    /// Index zero-padded to the width of the total count.
    pub label: String,
    pub title: String,
    pub selected: bool,
}
