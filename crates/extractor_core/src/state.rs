use std::collections::VecDeque;

use crate::view_model::{AppViewModel, ControlsView, VideoRowView};
use crate::{
    ErrorKind, FormState, Notification, NotificationKind, PlaylistSelector, ProgressTracker,
};

/// Lifecycle of the single extraction a controller may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Request issued, response headers not yet received.
    Submitting,
    /// Response body is being decoded.
    Streaming,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    form: FormState,
    phase: Phase,
    list_loading: bool,
    playlist: PlaylistSelector,
    progress: ProgressTracker,
    log: Vec<String>,
    notifications: VecDeque<Notification>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let width = self.playlist.index_width();
        let rows = if self.form.wants_video_list() {
            self.playlist
                .rows()
                .into_iter()
                .map(|video| VideoRowView {
                    index: video.index,
                    label: format!("{:0width$}", video.index, width = width),
                    title: video.title.clone(),
                    selected: self.playlist.is_selected(video.index),
                })
                .collect()
        } else {
            Vec::new()
        };

        AppViewModel {
            phase: self.phase,
            form: self.form.clone(),
            controls: self.controls(),
            show_playlist_options: self.form.input_type == crate::InputType::Playlist,
            show_range_options: self.form.wants_video_list(),
            list_loading: self.list_loading,
            summary: self.playlist.summary(),
            rows,
            all_selected: self.playlist.all_selected(),
            sort: self.playlist.sort_direction(),
            progress_percent: self.progress.percent(),
            recent_progress: self.progress.recent().map(ToOwned::to_owned).collect(),
            log: self.log.clone(),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn playlist(&self) -> &PlaylistSelector {
        &self.playlist
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// No extraction and no list fetch in flight.
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle && !self.list_loading
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Takes the notifications the front end has not shown yet, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn controls(&self) -> ControlsView {
        let idle = self.is_idle();
        ControlsView {
            submit_enabled: idle,
            range_type_enabled: idle,
            abort_enabled: self.phase != Phase::Idle,
        }
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn playlist_mut(&mut self) -> &mut PlaylistSelector {
        self.dirty = true;
        &mut self.playlist
    }

    pub(crate) fn progress_mut(&mut self) -> &mut ProgressTracker {
        self.dirty = true;
        &mut self.progress
    }

    pub(crate) fn is_list_loading(&self) -> bool {
        self.list_loading
    }

    pub(crate) fn set_list_loading(&mut self, loading: bool) {
        self.list_loading = loading;
        self.dirty = true;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    /// Clears the progress view at the start of a submission.
    pub(crate) fn reset_progress(&mut self, first_line: &str) {
        self.progress = ProgressTracker::new();
        self.log = vec![first_line.to_string()];
        self.dirty = true;
    }

    pub(crate) fn append_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        self.dirty = true;
    }

    /// Appends a line to the log and queues it as a blocking notification.
    pub(crate) fn announce(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.append_log(message.clone());
        self.notifications.push_back(Notification {
            kind: NotificationKind::Info,
            message,
        });
    }

    /// Single dispatch point for user-visible errors. The log line is the
    /// message as given; the kind only travels with the notification.
    pub(crate) fn report(&mut self, kind: ErrorKind, message: impl Into<String>) {
        let message = message.into();
        self.append_log(message.clone());
        self.notifications.push_back(Notification {
            kind: NotificationKind::Error(kind),
            message,
        });
    }
}
