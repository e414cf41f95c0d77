use extractor_core::{
    update, AppState, Effect, ErrorKind, Failure, InputType, Msg, NotificationKind,
    PlaylistSelector, RangeType, SortDirection, VideoEntry,
};

fn init_logging() {
    extractor_logging::initialize_for_tests();
}

fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter().fold((state, Vec::new()), |(state, mut all), msg| {
        let (state, effects) = update(state, msg);
        all.extend(effects);
        (state, all)
    })
}

fn videos(indices: &[u32]) -> Vec<VideoEntry> {
    indices
        .iter()
        .map(|&index| VideoEntry {
            index,
            title: format!("Video {index}"),
        })
        .collect()
}

fn listing_state(indices: &[u32]) -> AppState {
    let (state, effects) = apply(
        AppState::new(),
        vec![
            Msg::UrlChanged("https://example.com/list".into()),
            Msg::InputTypeChanged(InputType::Playlist),
            Msg::RangeTypeChanged(RangeType::Specific),
        ],
    );
    assert_eq!(effects.len(), 1);
    let (state, _) = update(
        state,
        Msg::PlaylistLoaded {
            total_videos: indices.len(),
            videos: videos(indices),
        },
    );
    state
}

fn displayed(state: &AppState) -> Vec<u32> {
    state.view().rows.iter().map(|row| row.index).collect()
}

#[test]
fn list_fetch_disables_controls_until_loaded() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            Msg::UrlChanged("https://example.com/list".into()),
            Msg::InputTypeChanged(InputType::Playlist),
            Msg::RangeTypeChanged(RangeType::Specific),
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::ListPlaylistVideos {
            url: "https://example.com/list".into()
        }]
    );
    let view = state.view();
    assert!(view.list_loading);
    assert!(!view.controls.submit_enabled);
    assert!(!view.controls.range_type_enabled);

    // Submitting while the list is loading is rejected by the disabled control.
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::PlaylistLoaded {
            total_videos: 3,
            videos: videos(&[1, 2, 3]),
        },
    );
    let view = state.view();
    assert!(!view.list_loading);
    assert!(view.controls.submit_enabled);
    assert!(view.controls.range_type_enabled);
    assert_eq!(
        view.summary.as_deref(),
        Some("Found 3 videos in the playlist.")
    );
    assert_eq!(displayed(&state), vec![1, 2, 3]);
}

#[test]
fn entering_specific_range_without_url_fails_fast() {
    init_logging();
    let (mut state, effects) = apply(
        AppState::new(),
        vec![
            Msg::InputTypeChanged(InputType::Playlist),
            Msg::RangeTypeChanged(RangeType::Specific),
        ],
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.list_loading);
    assert!(view.controls.submit_enabled);
    assert!(view.controls.range_type_enabled);
    let notifications = state.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Please enter a playlist URL.");
    assert_eq!(
        notifications[0].kind,
        NotificationKind::Error(ErrorKind::Validation)
    );
}

#[test]
fn select_all_collects_every_listed_index() {
    init_logging();
    let state = listing_state(&[1, 2, 3, 10]);

    let (state, _) = update(state, Msg::SelectAllToggled(true));
    assert_eq!(
        state.playlist().collect_selection(),
        vec!["1", "2", "3", "10"]
    );
    assert!(state.view().all_selected);

    let (state, _) = update(state, Msg::SelectAllToggled(false));
    assert!(state.playlist().collect_selection().is_empty());
    assert!(!state.view().all_selected);
}

#[test]
fn selection_follows_display_order() {
    init_logging();
    let state = listing_state(&[1, 2, 3]);
    let (state, _) = apply(
        state,
        vec![
            Msg::RowToggled {
                index: 1,
                checked: true,
            },
            Msg::RowToggled {
                index: 3,
                checked: true,
            },
            Msg::SortClicked,
            Msg::SortClicked,
        ],
    );

    assert_eq!(state.playlist().collect_selection(), vec!["3", "1"]);
}

#[test]
fn toggling_unknown_row_is_ignored() {
    init_logging();
    let mut state = listing_state(&[1, 2]);
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::RowToggled {
            index: 99,
            checked: true,
        },
    );
    assert!(!state.consume_dirty());
    assert!(state.playlist().collect_selection().is_empty());
}

#[test]
fn sorting_twice_restores_order_and_compares_numerically() {
    init_logging();
    let state = listing_state(&[1, 2, 9, 10, 11]);
    assert_eq!(state.view().sort, None);

    let (state, _) = update(state, Msg::SortClicked);
    assert_eq!(state.view().sort, Some(SortDirection::Ascending));
    let ascending = displayed(&state);
    assert_eq!(ascending, vec![1, 2, 9, 10, 11]);

    let (state, _) = update(state, Msg::SortClicked);
    assert_eq!(state.view().sort, Some(SortDirection::Descending));
    assert_eq!(displayed(&state), vec![11, 10, 9, 2, 1]);

    let (state, _) = update(state, Msg::SortClicked);
    assert_eq!(displayed(&state), ascending);
}

#[test]
fn backend_order_is_kept_until_first_sort() {
    let mut selector = PlaylistSelector::new();
    selector.replace(3, videos(&[10, 9, 1]));

    let order = |selector: &PlaylistSelector| -> Vec<u32> {
        selector.rows().iter().map(|video| video.index).collect()
    };
    assert_eq!(order(&selector), vec![10, 9, 1]);

    selector.toggle_sort();
    assert_eq!(order(&selector), vec![1, 9, 10]);
    selector.toggle_sort();
    assert_eq!(order(&selector), vec![10, 9, 1]);
    selector.toggle_sort();
    assert_eq!(order(&selector), vec![1, 9, 10]);

    selector.replace(3, videos(&[10, 9, 1]));
    assert_eq!(selector.sort_direction(), None);
    assert_eq!(order(&selector), vec![10, 9, 1]);
}

#[test]
fn row_labels_are_padded_to_total_width() {
    init_logging();
    let state = listing_state(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    let labels: Vec<String> = state
        .view()
        .rows
        .iter()
        .take(2)
        .map(|row| row.label.clone())
        .collect();
    assert_eq!(labels, vec!["01", "02"]);
}

#[test]
fn failed_refresh_keeps_previous_list_and_selection() {
    init_logging();
    let state = listing_state(&[1, 2, 3]);
    let (state, _) = update(
        state,
        Msg::RowToggled {
            index: 2,
            checked: true,
        },
    );

    let (state, effects) = update(state, Msg::RefreshListClicked);
    assert_eq!(
        effects,
        vec![Effect::ListPlaylistVideos {
            url: "https://example.com/list".into()
        }]
    );

    let (mut state, _) = update(
        state,
        Msg::PlaylistFailed(Failure::new(ErrorKind::Backend, "bad url")),
    );

    let view = state.view();
    assert_eq!(displayed(&state), vec![1, 2, 3]);
    assert_eq!(state.playlist().collect_selection(), vec!["2"]);
    assert!(view.controls.submit_enabled);
    assert!(view.controls.range_type_enabled);
    assert_eq!(
        view.log.last().map(String::as_str),
        Some("Error fetching video list: bad url")
    );
    let notifications = state.drain_notifications();
    assert_eq!(
        notifications[0].kind,
        NotificationKind::Error(ErrorKind::Backend)
    );
}

#[test]
fn fresh_listing_resets_selection() {
    init_logging();
    let state = listing_state(&[1, 2, 3]);
    let (state, _) = apply(
        state,
        vec![
            Msg::SelectAllToggled(true),
            Msg::SortClicked,
            Msg::RefreshListClicked,
            Msg::PlaylistLoaded {
                total_videos: 2,
                videos: videos(&[1, 2]),
            },
        ],
    );

    assert!(state.playlist().collect_selection().is_empty());
    assert_eq!(state.view().sort, None);
    assert_eq!(displayed(&state), vec![1, 2]);
}

#[test]
fn leaving_specific_range_clears_table_and_summary() {
    init_logging();
    let state = listing_state(&[1, 2, 3]);
    let (state, effects) = update(state, Msg::RangeTypeChanged(RangeType::Entire));

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.show_range_options);
    assert!(view.rows.is_empty());
    assert_eq!(view.summary, None);

    // Coming back requires a fresh fetch.
    let (state, effects) = update(state, Msg::RangeTypeChanged(RangeType::Specific));
    assert_eq!(effects.len(), 1);
    assert!(state.view().rows.is_empty());
}

#[test]
fn listing_that_arrives_after_leaving_is_dropped() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::UrlChanged("https://example.com/list".into()),
            Msg::InputTypeChanged(InputType::Playlist),
            Msg::RangeTypeChanged(RangeType::Specific),
            Msg::InputTypeChanged(InputType::Single),
            Msg::PlaylistLoaded {
                total_videos: 2,
                videos: videos(&[1, 2]),
            },
        ],
    );

    let view = state.view();
    assert!(view.rows.is_empty());
    assert!(!state.playlist().is_loaded());
    assert!(view.controls.submit_enabled);
}
