//! The UI-facing state snapshot and its small enums.

use std::sync::Arc;

use crate::catalog::Track;

pub const NO_CONNECTION: &str = "No internet connection. Please check your network.";
pub const CATALOG_FAILED: &str = "Failed to load tracks. Please try again later.";
pub const CATALOG_EMPTY: &str = "No tracks found";
pub const PLAYBACK_OFFLINE: &str = "Playback failed: No internet connection.";

pub fn playback_error(detail: &str) -> String {
    format!("Playback error: {detail}")
}

/// Ordering applied to the track list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SortMode {
    /// The order the catalog returned.
    #[default]
    None,
    /// Lexicographic on title.
    ByName,
    /// Shortest first.
    ByDuration,
}

/// Where the current track is in its lifecycle.
///
/// Ended and errored playback are not kept as phases: cleanup folds them back
/// to `Idle` and only `error`/`is_playing` keep a trace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Buffering,
    Playing,
    Paused,
}

/// Immutable snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerState {
    pub tracks: Vec<Arc<Track>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_track: Option<Arc<Track>>,
    pub is_playing: bool,
    pub position_secs: u32,
    pub sort_mode: SortMode,
    pub is_buffering: bool,
    pub phase: PlaybackPhase,
}

impl PlayerState {
    /// Index of the current track in `tracks`, looked up by id.
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current_track.as_ref()?;
        self.tracks.iter().position(|t| t.id == current.id)
    }
}
