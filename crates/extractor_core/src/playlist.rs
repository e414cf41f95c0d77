use std::collections::BTreeSet;

/// One row of a playlist listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    /// 1-based position in the source playlist.
    pub index: u32,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Next direction after a header click; an unsorted table sorts ascending.
    fn after(current: Option<Self>) -> Self {
        match current {
            None | Some(SortDirection::Descending) => SortDirection::Ascending,
            Some(SortDirection::Ascending) => SortDirection::Descending,
        }
    }
}

/// Playlist contents offered for range selection.
///
/// `videos` keeps the backend order, which is also the display order until the
/// first sort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistSelector {
    videos: Vec<VideoEntry>,
    selected: BTreeSet<u32>,
    sort: Option<SortDirection>,
    total_videos: Option<usize>,
}

impl PlaylistSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the listing and starts over with an empty selection.
    pub fn replace(&mut self, total_videos: usize, videos: Vec<VideoEntry>) {
        self.videos = videos;
        self.selected.clear();
        self.sort = None;
        self.total_videos = Some(total_videos);
    }

    /// Drops the displayed listing and summary.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.total_videos.is_some()
    }

    pub fn summary(&self) -> Option<String> {
        self.total_videos
            .map(|total| format!("Found {total} videos in the playlist."))
    }

    /// `None` while rows are still in backend order.
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort
    }

    pub fn toggle_sort(&mut self) {
        self.sort = Some(SortDirection::after(self.sort));
    }

    /// Rows in display order. Indices compare numerically.
    pub fn rows(&self) -> Vec<&VideoEntry> {
        let mut rows: Vec<&VideoEntry> = self.videos.iter().collect();
        match self.sort {
            None => {}
            Some(SortDirection::Ascending) => rows.sort_by(|a, b| a.index.cmp(&b.index)),
            Some(SortDirection::Descending) => rows.sort_by(|a, b| b.index.cmp(&a.index)),
        }
        rows
    }

    pub fn contains(&self, index: u32) -> bool {
        self.videos.iter().any(|video| video.index == index)
    }

    pub fn is_selected(&self, index: u32) -> bool {
        self.selected.contains(&index)
    }

    /// Returns false when no listed row has `index`.
    pub fn toggle_row(&mut self, index: u32, checked: bool) -> bool {
        if !self.contains(index) {
            return false;
        }
        if checked {
            self.selected.insert(index);
        } else {
            self.selected.remove(&index);
        }
        true
    }

    pub fn toggle_all(&mut self, checked: bool) {
        if checked {
            self.selected = self.videos.iter().map(|video| video.index).collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn all_selected(&self) -> bool {
        !self.videos.is_empty() && self.videos.iter().all(|v| self.selected.contains(&v.index))
    }

    /// Selected indices in display order, without leading zeros.
    pub fn collect_selection(&self) -> Vec<String> {
        self.rows()
            .into_iter()
            .filter(|video| self.selected.contains(&video.index))
            .map(|video| video.index.to_string())
            .collect()
    }

    /// Width used to zero-pad indices for display, matching the total count.
    pub fn index_width(&self) -> usize {
        let total = self.total_videos.unwrap_or(self.videos.len()).max(1);
        total.to_string().len()
    }
}
