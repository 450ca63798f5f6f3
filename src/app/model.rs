//! Application model: the latest state snapshot plus view-only cursor state.
//!
//! Everything about playback and the track list comes from the coordinator;
//! `App` only adds what the coordinator does not care about, like which row
//! the cursor is on and whether the details popup is open.

use std::sync::Arc;

use crate::catalog::Track;
use crate::coordinator::PlayerState;

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub state: Arc<PlayerState>,
    pub selected: usize,
    pub details_window: bool,
}

impl App {
    pub fn new(state: Arc<PlayerState>) -> Self {
        Self {
            state,
            selected: 0,
            details_window: false,
        }
    }

    /// Swap in a new snapshot, keeping the cursor on the same track when it
    /// survives a re-sort or a refetch.
    pub fn set_state(&mut self, state: Arc<PlayerState>) {
        let selected_id = self.selected_track().map(|t| t.id.clone());
        self.state = state;

        let len = self.state.tracks.len();
        self.selected = selected_id
            .and_then(|id| self.state.tracks.iter().position(|t| t.id == id))
            .unwrap_or_else(|| self.selected.min(len.saturating_sub(1)));
    }

    pub fn has_tracks(&self) -> bool {
        !self.state.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<Arc<Track>> {
        self.state.tracks.get(self.selected).cloned()
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.state.tracks.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        let len = self.state.tracks.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.state.tracks.len().saturating_sub(1);
    }

    /// Absolute seek target `delta_secs` away from the playhead, clamped to the
    /// current track. `None` when nothing is loaded.
    pub fn scrub_target(&self, delta_secs: i64) -> Option<f32> {
        let track = self.state.current_track.as_ref()?;
        let target = i64::from(self.state.position_secs).saturating_add(delta_secs);
        let clamped = target.clamp(0, i64::from(track.duration_secs));
        Some(clamped as f32)
    }
}
