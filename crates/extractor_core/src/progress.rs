use std::collections::VecDeque;

/// Number of progress messages kept on screen.
pub const RECENT_PROGRESS_LIMIT: usize = 5;

/// Folds progress records into counters, a percentage and a short log.
///
/// Counters are self-healing: a record without `current` advances the
/// previous value by one, and a record without `total` keeps the previous total.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    current: u64,
    total: u64,
    percent: f64,
    recent: VecDeque<String>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self {
            current: 0,
            total: 1,
            percent: 0.0,
            recent: VecDeque::with_capacity(RECENT_PROGRESS_LIMIT + 1),
        }
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, current: Option<u64>, total: Option<u64>, message: String) {
        self.current = current.unwrap_or(self.current.saturating_add(1));
        self.total = total.unwrap_or(self.total);
        self.percent = percentage(self.current, self.total);

        self.recent.push_front(message);
        self.recent.truncate(RECENT_PROGRESS_LIMIT);
    }

    /// Marks the indicator as complete once the stream has ended.
    pub fn complete(&mut self) {
        self.percent = 100.0;
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Recent messages, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }
}

fn percentage(current: u64, total: u64) -> f64 {
    let total = total.max(1) as f64;
    (current as f64 / total * 100.0).clamp(0.0, 100.0)
}
