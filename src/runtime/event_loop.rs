use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::coordinator::{Inbound, PlaybackPhase, PlayerState, SortMode};
use crate::ui;

use super::LiveCoordinator;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: applies inbox messages, mirrors state snapshots
/// into the app, draws and handles input. Returns `Ok(())` when quit is
/// requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    coordinator: &mut LiveCoordinator,
    inbox: &Receiver<Inbound>,
    updates: &Receiver<Arc<PlayerState>>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        // All state mutation happens here, on the UI thread.
        while let Ok(msg) = inbox.try_recv() {
            coordinator.handle(msg);
        }
        while let Ok(snapshot) = updates.try_recv() {
            app.set_state(snapshot);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, coordinator, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    coordinator: &mut LiveCoordinator,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if let Some(track) = app.selected_track() {
                coordinator.play_track(track);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => match app.state.phase {
            PlaybackPhase::Playing => coordinator.pause_track(),
            PlaybackPhase::Paused => coordinator.resume_track(),
            PlaybackPhase::Idle => {
                if let Some(track) = app.selected_track() {
                    coordinator.play_track(track);
                }
            }
            PlaybackPhase::Buffering => debug!("play/pause ignored while buffering"),
        },
        KeyCode::Char('H') => scrub(app, coordinator, -scrub_delta(settings)),
        KeyCode::Char('L') => scrub(app, coordinator, scrub_delta(settings)),
        KeyCode::Char('1') => coordinator.sort_tracks(SortMode::ByName),
        KeyCode::Char('2') => coordinator.sort_tracks(SortMode::ByDuration),
        KeyCode::Char('0') => coordinator.sort_tracks(SortMode::None),
        KeyCode::Char('r') => coordinator.fetch_catalog(),
        KeyCode::Char('K') => app.toggle_details_window(),
        KeyCode::Esc if app.details_window => app.toggle_details_window(),
        _ => {}
    }

    false
}

fn scrub_delta(settings: &config::Settings) -> i64 {
    i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX)
}

fn scrub(app: &App, coordinator: &mut LiveCoordinator, delta_secs: i64) {
    if let Some(target) = app.scrub_target(delta_secs) {
        coordinator.seek_to(target);
    }
}
