use super::*;
use crate::catalog::Track;
use crate::coordinator::PlayerState;
use std::sync::Arc;

fn t(id: &str, duration_secs: u32) -> Arc<Track> {
    Arc::new(Track {
        id: id.into(),
        title: format!("Title {id}"),
        artist: "Someone".into(),
        duration_secs,
        thumbnail: String::new(),
        audio_url: format!("https://audio.test/{id}.mp3"),
    })
}

fn state(tracks: Vec<Arc<Track>>) -> Arc<PlayerState> {
    Arc::new(PlayerState {
        tracks,
        ..PlayerState::default()
    })
}

fn app_with(ids: &[&str]) -> App {
    App::new(state(ids.iter().map(|id| t(id, 100)).collect()))
}

#[test]
fn next_and_prev_wrap_around() {
    let mut app = app_with(&["a", "b", "c"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    app.next();
    assert_eq!(app.selected, 2);
}

#[test]
fn navigation_on_empty_list_is_a_no_op() {
    let mut app = App::default();
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
    assert!(!app.has_tracks());
}

#[test]
fn select_first_and_last() {
    let mut app = app_with(&["a", "b", "c", "d"]);
    app.select_last();
    assert_eq!(app.selected_track().unwrap().id, "d");
    app.select_first();
    assert_eq!(app.selected_track().unwrap().id, "a");
}

#[test]
fn set_state_keeps_cursor_on_the_same_track_after_reorder() {
    let a = t("a", 10);
    let b = t("b", 20);
    let c = t("c", 30);
    let mut app = App::new(state(vec![a.clone(), b.clone(), c.clone()]));
    app.next();
    assert_eq!(app.selected_track().unwrap().id, "b");

    app.set_state(state(vec![c, a, b]));
    assert_eq!(app.selected, 2);
    assert_eq!(app.selected_track().unwrap().id, "b");
}

#[test]
fn set_state_clamps_cursor_when_track_disappears() {
    let mut app = app_with(&["a", "b", "c"]);
    app.select_last();

    app.set_state(state(vec![t("x", 1)]));
    assert_eq!(app.selected, 0);

    app.set_state(state(Vec::new()));
    assert_eq!(app.selected, 0);
}

#[test]
fn toggle_details_window() {
    let mut app = App::default();
    app.toggle_details_window();
    assert!(app.details_window);
    app.toggle_details_window();
    assert!(!app.details_window);
}

#[test]
fn scrub_target_is_clamped_to_track_bounds() {
    let track = t("a", 100);
    let app = App::new(Arc::new(PlayerState {
        tracks: vec![track.clone()],
        current_track: Some(track),
        position_secs: 97,
        ..PlayerState::default()
    }));

    assert_eq!(app.scrub_target(5), Some(100.0));
    assert_eq!(app.scrub_target(-5), Some(92.0));
    assert_eq!(app.scrub_target(-500), Some(0.0));
}

#[test]
fn scrub_target_requires_a_current_track() {
    let app = app_with(&["a"]);
    assert_eq!(app.scrub_target(5), None);
}
