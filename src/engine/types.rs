//! Engine-facing types: notifications, errors, commands and the engine trait.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use crate::coordinator::Inbound;

/// Lifecycle notification emitted by a media engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Media data is not yet ready to play.
    BufferingStarted,
    /// Media is decoded and can start immediately.
    Ready,
    /// The engine started or stopped producing audio.
    PlayingChanged(bool),
    /// End of stream reached.
    Ended,
    /// Nothing is loaded any more.
    Idle,
    /// Loading or playback failed; carries a human-readable detail.
    Error(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("media engine has been released")]
    Released,

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("could not decode media: {0}")]
    Decode(String),
}

/// Playback backend driven by the coordinator.
///
/// Every call is fire-and-forget: results arrive later as [`EngineEvent`]s,
/// each tagged with the load it belongs to. After [`MediaEngine::release`] no
/// further calls are valid.
pub trait MediaEngine {
    /// Start loading `uri`. The new load id is visible through
    /// [`MediaEngine::current_load`] as soon as this returns.
    fn load(&mut self, uri: &str);
    /// Id of the most recent `load`; `0` before the first one.
    fn current_load(&self) -> u64;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    /// Position of the playhead; fails once the engine is released.
    fn current_position(&self) -> Result<Duration, EngineError>;
    fn release(&mut self);
}

/// Posts engine notifications onto the coordinator inbox.
#[derive(Clone)]
pub struct EngineNotifier {
    tx: Sender<Inbound>,
}

impl EngineNotifier {
    pub fn new(tx: Sender<Inbound>) -> Self {
        Self { tx }
    }

    /// Post `event` on behalf of load `load`.
    pub fn notify(&self, load: u64, event: EngineEvent) {
        trace!(load, ?event, "engine notification");
        // The coordinator may already be gone during teardown.
        let _ = self.tx.send(Inbound::Engine { load, event });
    }
}

#[derive(Debug)]
pub(super) enum EngineCmd {
    /// Start fetching and decoding `uri`; replaces anything loaded.
    Load { uri: String, load: u64 },
    /// A download started by `Load` finished.
    Loaded {
        generation: u64,
        result: Result<Arc<[u8]>, EngineError>,
    },
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Quit,
}

/// Playhead shared between the audio thread and the engine handle.
pub(super) type PositionHandle = Arc<Mutex<Duration>>;
