#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Single,
    Playlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeType {
    #[default]
    Entire,
    Specific,
}

/// Current contents of the extraction form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub input_type: InputType,
    pub url: String,
    pub playlist_name: String,
    pub range_type: RangeType,
    pub start_index: String,
    pub end_index: String,
}

impl FormState {
    /// True when the playlist table should be shown and populated.
    pub fn wants_video_list(&self) -> bool {
        self.input_type == InputType::Playlist && self.range_type == RangeType::Specific
    }

    /// Builds the request for one submission. `selection` is only folded in
    /// for a specific range of a playlist.
    pub(crate) fn to_request(&self, selection: Vec<String>) -> ExtractionRequest {
        let selected_indices = if self.wants_video_list() {
            selection
        } else {
            Vec::new()
        };
        ExtractionRequest {
            input_type: self.input_type,
            url: self.url.clone(),
            playlist_name: self.playlist_name.clone(),
            range_type: self.range_type,
            start_index: self.start_index.trim().to_string(),
            end_index: self.end_index.trim().to_string(),
            selected_indices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub input_type: InputType,
    pub url: String,
    pub playlist_name: String,
    pub range_type: RangeType,
    pub start_index: String,
    pub end_index: String,
    /// Decimal indices without leading zeros, in display order.
    pub selected_indices: Vec<String>,
}
