//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::catalog::Track;
use crate::config::{ControlsSettings, UiSettings};
use crate::coordinator::{PlaybackPhase, PlayerState, SortMode};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    // H/L is filled dynamically from config.
    map.insert("1/2/0", "sort name/duration/off");
    map.insert("r", "reload");
    map.insert("K", "details");
    map.insert("q", "quit");
    map
});

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "H/L", "enter", "space/p", "gg/G", "1/2/0", "K", "r", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format whole seconds as `MM:SS`.
fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn track_label(track: &Track, show_artist: bool) -> String {
    let artist = track.artist.trim();
    if show_artist && !artist.is_empty() {
        format!("{} - {}", artist, track.title)
    } else {
        track.title.clone()
    }
}

fn sort_label(mode: SortMode) -> &'static str {
    match mode {
        SortMode::None => "SORT: Fetch order",
        SortMode::ByName => "SORT: Name",
        SortMode::ByDuration => "SORT: Duration",
    }
}

fn phase_label(phase: PlaybackPhase) -> &'static str {
    match phase {
        PlaybackPhase::Idle => "Stopped",
        PlaybackPhase::Buffering => "Buffering…",
        PlaybackPhase::Playing => "Playing",
        PlaybackPhase::Paused => "Paused",
    }
}

fn status_text(state: &PlayerState, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = vec![format!(" {}", sort_label(state.sort_mode))];

    if state.is_loading {
        parts.push("Loading tracks…".to_string());
    }

    match &state.current_track {
        Some(track) => {
            parts.push(format!(
                "Song: {} [{} / {}]",
                track_label(track, ui.show_artist),
                format_mmss(state.position_secs),
                format_mmss(track.duration_secs)
            ));
            // Buffering can overlap a playing phase when the stream stalls.
            if state.is_buffering && state.phase != PlaybackPhase::Buffering {
                parts.push(phase_label(PlaybackPhase::Buffering).to_string());
            }
            parts.push(phase_label(state.phase).to_string());
        }
        None => parts.push(phase_label(PlaybackPhase::Idle).to_string()),
    }

    if let Some(error) = &state.error {
        parts.push(format!("ERROR: {error}"));
    }

    parts.join(" • ")
}

/// Fraction of the current track already played, in `0.0..=1.0`.
fn progress_ratio(state: &PlayerState) -> f64 {
    match &state.current_track {
        Some(track) if track.duration_secs > 0 => {
            (f64::from(state.position_secs) / f64::from(track.duration_secs)).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

fn details_text(track: Option<&Track>) -> String {
    let Some(track) = track else {
        return "No track selected".to_string();
    };
    format!(
        "Title: {}\nArtist: {}\nDuration: {} ({}s)\nId: {}\nAudio: {}\nCover: {}",
        track.title,
        track.artist,
        format_mmss(track.duration_secs),
        track.duration_secs,
        track.id,
        track.audio_url,
        if track.thumbnail.is_empty() {
            "-"
        } else {
            track.thumbnail.as_str()
        }
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let state = app.state.as_ref();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" jamplay ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let mut status_par = Paragraph::new(status_text(state, ui_settings))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    if state.is_buffering || state.is_loading {
        status_par = status_par.slow_blink();
    }
    frame.render_widget(status_par, chunks[1]);

    // Main list, or a message panel when there is nothing to list.
    if !app.has_tracks() {
        let message = match (&state.error, state.is_loading) {
            (_, true) => "Loading tracks…".to_string(),
            (Some(error), false) => format!("{error}\n\nPress r to retry."),
            (None, false) => "Press r to load tracks.".to_string(),
        };
        let panel = Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .wrap(Wrap { trim: true });
        frame.render_widget(panel, chunks[2]);
    } else {
        draw_track_list(frame, app, ui_settings, chunks[2]);
    }

    // Overlay details popup (keeps list visible under it)
    if app.details_window {
        let popup_area = centered_rect_sized(72, 9, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let selected = app.selected_track();
        let details = Paragraph::new(details_text(selected.as_deref()))
            .block(
                Block::default()
                    .padding(LEFT_PAD)
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(details, popup_area);
    }

    let duration = state
        .current_track
        .as_ref()
        .map_or(0, |t| t.duration_secs);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(progress_ratio(state))
        .label(format!(
            "{} / {}",
            format_mmss(state.position_secs),
            format_mmss(duration)
        ));
    frame.render_widget(gauge, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_track_list(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let state = app.state.as_ref();
    let current = state.current_index();

    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = state.tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total.saturating_sub(1));
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let visible_items: Vec<ListItem> = state.tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let marker = if current == Some(start + offset) { "♪ " } else { "  " };
            ListItem::new(format!(
                "{}{} ({})",
                marker,
                track_label(track, ui_settings.show_artist),
                format_mmss(track.duration_secs)
            ))
        })
        .collect();

    let title = format!(" tracks ({total}) ");
    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ratatui::widgets::ListState::default();
    list_state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut list_state);
}
