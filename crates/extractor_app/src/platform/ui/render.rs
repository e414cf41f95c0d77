use extractor_core::{AppViewModel, InputType, Phase, RangeType, SortDirection, VideoRowView};

const BAR_WIDTH: usize = 20;

/// Prints only what changed between two view models.
#[derive(Default)]
pub struct Renderer {
    last: Option<AppViewModel>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let previous = self.last.take().unwrap_or_default();
        let mut lines = Vec::new();

        if view.phase != previous.phase {
            lines.push(format!("-- {}", phase_label(view.phase)));
        }
        if view.list_loading && !previous.list_loading {
            lines.push("Loading video list...".to_string());
        }

        let log_continues = view.log.len() >= previous.log.len()
            && view.log[..previous.log.len()] == previous.log[..];
        let new_log = if log_continues {
            &view.log[previous.log.len()..]
        } else {
            &view.log[..]
        };
        lines.extend(new_log.iter().cloned());

        if view.progress_percent != previous.progress_percent
            || view.recent_progress.first() != previous.recent_progress.first()
        {
            lines.push(progress_line(view));
        }

        if view.summary != previous.summary || view.rows != previous.rows {
            if let Some(summary) = &view.summary {
                lines.push(summary.clone());
            }
            lines.extend(table_lines(&view.rows, view.sort));
        }

        self.last = Some(view.clone());
        lines
    }
}

/// Full status block for the `show` command.
pub fn snapshot(view: &AppViewModel) -> Vec<String> {
    let form = &view.form;
    let mut lines = vec![
        format!("Phase: {}", phase_label(view.phase)),
        format!(
            "Input: {}  URL: {}",
            match form.input_type {
                InputType::Single => "single video",
                InputType::Playlist => "playlist",
            },
            blank_as_dash(&form.url)
        ),
    ];

    if view.show_playlist_options {
        lines.push(format!(
            "Playlist name: {}  Range: {}{}",
            blank_as_dash(&form.playlist_name),
            match form.range_type {
                RangeType::Entire => "entire",
                RangeType::Specific => "specific",
            },
            if view.controls.range_type_enabled {
                ""
            } else {
                " (locked)"
            }
        ));
    }
    if view.show_range_options {
        lines.push(format!(
            "Start: {}  End: {}",
            blank_as_dash(&form.start_index),
            blank_as_dash(&form.end_index)
        ));
        if view.list_loading {
            lines.push("Loading video list...".to_string());
        }
        if let Some(summary) = &view.summary {
            lines.push(summary.clone());
        }
        lines.extend(table_lines(&view.rows, view.sort));
        if !view.rows.is_empty() {
            lines.push(format!(
                "Select all: {}",
                if view.all_selected { "on" } else { "off" }
            ));
        }
    }

    lines.push(progress_line(view));
    for message in view.recent_progress.iter().skip(1) {
        lines.push(format!("  {message}"));
    }
    lines.push(format!(
        "Submit: {}  Abort: {}",
        enabled_label(view.controls.submit_enabled),
        enabled_label(view.controls.abort_enabled)
    ));
    lines
}

fn progress_line(view: &AppViewModel) -> String {
    let percent = view.progress_percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH.saturating_sub(filled))
    );
    match view.recent_progress.first() {
        Some(message) => format!("[{bar}] {percent:>3.0}% {message}"),
        None => format!("[{bar}] {percent:>3.0}%"),
    }
}

fn table_lines(rows: &[VideoRowView], sort: Option<SortDirection>) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    let arrow = match sort {
        None => " ",
        Some(SortDirection::Ascending) => "^",
        Some(SortDirection::Descending) => "v",
    };
    let mut lines = vec![format!("    #{arrow}  Title")];
    lines.extend(rows.iter().map(|row| {
        format!(
            "[{}] {}  {}",
            if row.selected { "x" } else { " " },
            row.label,
            row.title
        )
    }));
    lines
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Submitting => "Submitting",
        Phase::Streaming => "Streaming",
    }
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

fn blank_as_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
