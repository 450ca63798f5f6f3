use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::catalog::{CatalogClient, CatalogError, Track};
use crate::connectivity::ConnectivityProbe;
use crate::engine::{EngineEvent, MediaEngine};

use super::inbox::Inbound;
use super::poller::PositionPoller;
use super::sort::ordered;
use super::state::*;
use super::store::StateStore;

/// Bridges a [`MediaEngine`] and a [`CatalogClient`] to a single
/// [`PlayerState`] owned by this value.
///
/// All methods, including [`Coordinator::handle`], must be called from the
/// same thread; asynchronous work reports back through the inbox whose sender
/// is passed to [`Coordinator::new`].
pub struct Coordinator<E, C, P>
where
    E: MediaEngine,
    C: CatalogClient,
    P: ConnectivityProbe,
{
    store: StateStore,
    engine: Option<E>,
    catalog: Arc<C>,
    probe: P,
    inbox: Sender<Inbound>,
    poller: PositionPoller,

    /// Tracks in the order the latest accepted fetch returned them.
    fetch_order: Vec<Arc<Track>>,
    /// Token of the most recent catalog request; older completions are dropped.
    latest_request: u64,
}

impl<E, C, P> Coordinator<E, C, P>
where
    E: MediaEngine,
    C: CatalogClient,
    P: ConnectivityProbe,
{
    pub fn new(
        engine: E,
        catalog: C,
        probe: P,
        inbox: Sender<Inbound>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store: StateStore::new(PlayerState::default()),
            engine: Some(engine),
            catalog: Arc::new(catalog),
            probe,
            inbox,
            poller: PositionPoller::new(poll_interval),
            fetch_order: Vec::new(),
            latest_request: 0,
        }
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> Arc<PlayerState> {
        self.store.snapshot()
    }

    /// Receive every snapshot published from now on, starting with the current one.
    pub fn subscribe(&mut self) -> Receiver<Arc<PlayerState>> {
        self.store.subscribe()
    }

    /// Whether the position-polling loop is live.
    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    /// Fetch the catalog on a worker thread.
    ///
    /// Without connectivity the catalog client is never called. Each call gets
    /// a fresh request token and only the newest one may update the state.
    pub fn fetch_catalog(&mut self) {
        if !self.probe.is_available() {
            warn!("catalog fetch skipped: no connectivity");
            self.store.update(|s| {
                s.is_loading = false;
                s.error = Some(NO_CONNECTION.to_string());
            });
            return;
        }

        self.latest_request += 1;
        let request = self.latest_request;
        self.store.update(|s| s.is_loading = true);
        debug!(request, "catalog fetch started");

        let catalog = Arc::clone(&self.catalog);
        let inbox = self.inbox.clone();
        let spawned = thread::Builder::new()
            .name("jamplay-catalog".to_string())
            .spawn(move || {
                let result = catalog.fetch_tracks();
                if inbox.send(Inbound::CatalogLoaded { request, result }).is_err() {
                    debug!(request, "coordinator gone; catalog result dropped");
                }
            });

        if let Err(e) = spawned {
            warn!(error = %e, "could not start catalog fetch");
            self.store.update(|s| {
                s.is_loading = false;
                s.error = Some(CATALOG_FAILED.to_string());
            });
        }
    }

    /// Reorder the track list. `SortMode::None` restores the fetch order.
    pub fn sort_tracks(&mut self, mode: SortMode) {
        let tracks = match mode {
            SortMode::None => self.fetch_order.clone(),
            _ => ordered(&self.store.snapshot().tracks, mode),
        };
        debug!(?mode, "sorting tracks");
        self.store.update(|s| {
            s.tracks = tracks;
            s.sort_mode = mode;
        });
    }

    /// Stop whatever is playing and start loading `track`.
    ///
    /// Returns before the engine is ready; the transition to playing arrives
    /// later as a notification.
    pub fn play_track(&mut self, track: Arc<Track>) {
        self.stop_playback();

        info!(id = %track.id, title = %track.title, "playing track");
        let uri = track.audio_url.clone();
        self.store.update(|s| {
            s.current_track = Some(track);
            s.position_secs = 0;
            s.is_buffering = true;
            s.error = None;
            s.phase = PlaybackPhase::Buffering;
        });

        if let Some(engine) = self.engine.as_mut() {
            engine.load(&uri);
            engine.play();
        }
    }

    pub fn pause_track(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
        }
    }

    pub fn resume_track(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.play();
        }
    }

    /// Seek to `position_secs` and show the new position right away.
    ///
    /// Negative or non-finite positions seek to the start.
    pub fn seek_to(&mut self, position_secs: f32) {
        let target = Duration::try_from_secs_f32(position_secs).unwrap_or(Duration::ZERO);
        if let Some(engine) = self.engine.as_mut() {
            engine.seek(target);
        }
        let secs = whole_secs(target);
        self.store.update(|s| s.position_secs = secs);
    }

    /// Apply one asynchronous message to the state.
    pub fn handle(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Engine { load, event } => self.on_engine_event(load, event),
            Inbound::CatalogLoaded { request, result } => self.on_catalog_loaded(request, result),
            Inbound::PositionTick { generation } => self.on_position_tick(generation),
        }
    }

    /// Cancel polling and release the engine. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.poller.cancel();
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
            engine.release();
            info!("coordinator shut down");
        }
    }

    fn stop_playback(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.poller.cancel();
        self.store.update(|s| {
            s.is_playing = false;
            s.position_secs = 0;
            s.phase = PlaybackPhase::Idle;
        });
    }

    fn on_engine_event(&mut self, load: u64, event: EngineEvent) {
        // Events from an earlier load, or from after shutdown, describe a track
        // that is no longer current.
        let current = self.engine.as_ref().map(|e| e.current_load());
        if current != Some(load) {
            debug!(?event, load, ?current, "dropping engine event for a superseded load");
            return;
        }
        debug!(?event, load, "engine event");
        match event {
            EngineEvent::BufferingStarted => self.store.update(|s| s.is_buffering = true),
            EngineEvent::Ready | EngineEvent::Idle => {
                self.store.update(|s| s.is_buffering = false)
            }
            EngineEvent::Ended => {
                self.stop_playback();
                self.store.update(|s| s.is_buffering = false);
            }
            EngineEvent::PlayingChanged(playing) => {
                self.store.update(|s| {
                    s.is_playing = playing;
                    s.phase = match (playing, s.phase) {
                        (true, _) => PlaybackPhase::Playing,
                        (false, PlaybackPhase::Playing) => PlaybackPhase::Paused,
                        (false, phase) => phase,
                    };
                });
                if playing {
                    self.poller.start(&self.inbox);
                } else {
                    self.poller.cancel();
                }
            }
            EngineEvent::Error(detail) => {
                let message = if self.probe.is_available() {
                    playback_error(&detail)
                } else {
                    PLAYBACK_OFFLINE.to_string()
                };
                warn!(%detail, "playback failed");
                self.store.update(|s| {
                    s.error = Some(message);
                    s.is_buffering = false;
                });
                self.stop_playback();
            }
        }
    }

    fn on_catalog_loaded(&mut self, request: u64, result: Result<Vec<Track>, CatalogError>) {
        if request != self.latest_request {
            debug!(
                request,
                latest = self.latest_request,
                "discarding stale catalog response"
            );
            return;
        }

        match result {
            Ok(tracks) => {
                info!(count = tracks.len(), "catalog loaded");
                self.fetch_order = tracks.into_iter().map(Arc::new).collect();
                let mode = self.store.snapshot().sort_mode;
                let tracks = ordered(&self.fetch_order, mode);
                self.store.update(|s| {
                    s.is_loading = false;
                    s.error = tracks.is_empty().then(|| CATALOG_EMPTY.to_string());
                    s.tracks = tracks;
                });
            }
            Err(e) => {
                warn!(error = %e, "catalog fetch failed");
                self.store.update(|s| {
                    s.is_loading = false;
                    s.error = Some(CATALOG_FAILED.to_string());
                });
            }
        }
    }

    fn on_position_tick(&mut self, generation: u64) {
        if !self.poller.accepts(generation) {
            trace!(generation, "stale position tick");
            return;
        }
        if !self.store.snapshot().is_playing {
            self.poller.cancel();
            return;
        }
        let Some(engine) = self.engine.as_ref() else {
            self.poller.cancel();
            return;
        };

        match engine.current_position() {
            Ok(position) => {
                let secs = whole_secs(position);
                self.store.update(|s| s.position_secs = secs);
            }
            Err(e) => {
                debug!(error = %e, "position unavailable; polling stopped");
                self.poller.cancel();
            }
        }
    }
}

impl<E, C, P> Drop for Coordinator<E, C, P>
where
    E: MediaEngine,
    C: CatalogClient,
    P: ConnectivityProbe,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn whole_secs(d: Duration) -> u32 {
    u32::try_from(d.as_secs()).unwrap_or(u32::MAX)
}
