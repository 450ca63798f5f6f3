use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::OutputStreamBuilder;
use tracing::{debug, warn};

use super::sink::{Fetch, Media, Output, PlaybackSink};
use super::types::{EngineCmd, EngineError, EngineEvent, EngineNotifier, PositionHandle};

/// How often the audio thread refreshes the playhead and checks for end of stream.
const TICK: Duration = Duration::from_millis(200);

/// Spawn the audio thread and wait until it has opened the output device.
pub(super) fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    cmd_tx: Sender<EngineCmd>,
    position: PositionHandle,
    notifier: EngineNotifier,
    fetch: Fetch,
) -> Result<JoinHandle<()>, EngineError> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<(), EngineError>>();

    let handle = thread::Builder::new()
        .name("jamplay-audio".to_string())
        .spawn(move || {
            // The output stream is not Send on every platform, so it lives and dies here.
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(EngineError::Output(e.to_string())));
                    return;
                }
            };
            // rodio logs to stderr when the stream is dropped, which would land on the TUI.
            stream.log_on_drop(false);
            let _ = ready_tx.send(Ok(()));

            AudioState::new(stream, fetch, cmd_tx, notifier, position).run(rx);
        })
        .map_err(|e| EngineError::Output(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(e)
        }
        Err(_) => {
            let _ = handle.join();
            Err(EngineError::Output(
                "audio thread exited during startup".to_string(),
            ))
        }
    }
}

/// Transition logic of the audio thread, independent of the real device.
pub(super) struct AudioState<O: Output> {
    output: O,
    fetch: Fetch,
    cmd_tx: Sender<EngineCmd>,
    notifier: EngineNotifier,
    position: PositionHandle,

    /// Bumped on every load/stop so late downloads can be recognised.
    generation: u64,
    /// Load id every notification is tagged with.
    load: u64,
    loading: bool,
    play_when_ready: bool,
    /// Seek requested before the media was ready.
    pending_seek: Option<Duration>,

    media: Option<Media>,
    sink: Option<O::Sink>,
    /// Offset the current sink was built at; the sink's own position counts from zero.
    seek_base: Duration,
    playing: bool,
}

impl<O: Output> AudioState<O> {
    pub(super) fn new(
        output: O,
        fetch: Fetch,
        cmd_tx: Sender<EngineCmd>,
        notifier: EngineNotifier,
        position: PositionHandle,
    ) -> Self {
        Self {
            output,
            fetch,
            cmd_tx,
            notifier,
            position,
            generation: 0,
            load: 0,
            loading: false,
            play_when_ready: false,
            pending_seek: None,
            media: None,
            sink: None,
            seek_base: Duration::ZERO,
            playing: false,
        }
    }

    fn run(mut self, rx: Receiver<EngineCmd>) {
        loop {
            match rx.recv_timeout(TICK) {
                Ok(EngineCmd::Quit) => break,
                Ok(cmd) => self.handle(cmd),
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.discard_sink();
        debug!("audio thread finished");
    }

    pub(super) fn handle(&mut self, cmd: EngineCmd) {
        match cmd {
            EngineCmd::Load { uri, load } => self.load(uri, load),
            EngineCmd::Loaded { generation, result } => self.loaded(generation, result),
            EngineCmd::Play => {
                if self.sink.is_some() {
                    self.start();
                } else if self.loading {
                    self.play_when_ready = true;
                } else {
                    debug!("play requested with nothing loaded");
                }
            }
            EngineCmd::Pause => {
                self.play_when_ready = false;
                if self.playing {
                    if let Some(ref sink) = self.sink {
                        sink.pause();
                    }
                    self.publish_position(self.playhead());
                    self.playing = false;
                    self.notify(EngineEvent::PlayingChanged(false));
                }
            }
            EngineCmd::Stop => self.stop(),
            EngineCmd::Seek(target) => self.seek(target),
            // Handled by the run loop.
            EngineCmd::Quit => {}
        }
    }

    fn notify(&self, event: EngineEvent) {
        self.notifier.notify(self.load, event);
    }

    fn load(&mut self, uri: String, load: u64) {
        // Anything said about the previous track is said under its own id.
        if self.playing {
            self.notify(EngineEvent::PlayingChanged(false));
        }
        self.discard_sink();

        self.load = load;
        self.generation += 1;
        self.loading = true;
        self.play_when_ready = false;
        self.pending_seek = None;
        self.media = None;
        self.seek_base = Duration::ZERO;
        self.playing = false;
        self.publish_position(Duration::ZERO);
        self.notify(EngineEvent::BufferingStarted);

        let generation = self.generation;
        debug!(%uri, load, generation, "loading media");

        let fetch = self.fetch.clone();
        let tx = self.cmd_tx.clone();
        let spawned = thread::Builder::new()
            .name("jamplay-download".to_string())
            .spawn(move || {
                let result = fetch(&uri);
                let _ = tx.send(EngineCmd::Loaded { generation, result });
            });

        if let Err(e) = spawned {
            self.loading = false;
            self.notify(EngineEvent::Error(e.to_string()));
        }
    }

    fn loaded(&mut self, generation: u64, result: Result<Media, EngineError>) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale download");
            return;
        }
        self.loading = false;

        let media = match result {
            Ok(media) => media,
            Err(e) => {
                warn!(error = %e, "media download failed");
                self.play_when_ready = false;
                self.pending_seek = None;
                self.notify(EngineEvent::Error(e.to_string()));
                return;
            }
        };

        let start_at = self.pending_seek.take().unwrap_or(Duration::ZERO);
        match self.output.open_sink(&media, start_at) {
            Ok(sink) => {
                debug!(bytes = media.len(), ?start_at, "media ready");
                self.sink = Some(sink);
                self.media = Some(media);
                self.seek_base = start_at;
                self.publish_position(start_at);
                self.notify(EngineEvent::Ready);
                if self.play_when_ready {
                    self.play_when_ready = false;
                    self.start();
                }
            }
            Err(e) => {
                warn!(error = %e, "media decode failed");
                self.play_when_ready = false;
                self.notify(EngineEvent::Error(e.to_string()));
            }
        }
    }

    fn start(&mut self) {
        if self.playing {
            return;
        }
        if let Some(ref sink) = self.sink {
            sink.play();
            self.playing = true;
            self.notify(EngineEvent::PlayingChanged(true));
        }
    }

    fn stop(&mut self) {
        let had_media = self.sink.is_some() || self.loading;

        self.generation += 1;
        self.loading = false;
        self.play_when_ready = false;
        self.pending_seek = None;
        if self.playing {
            self.playing = false;
            self.notify(EngineEvent::PlayingChanged(false));
        }
        self.discard_sink();
        self.media = None;
        self.seek_base = Duration::ZERO;
        self.publish_position(Duration::ZERO);

        if had_media {
            self.notify(EngineEvent::Idle);
        }
    }

    fn seek(&mut self, target: Duration) {
        let Some(media) = self.media.clone() else {
            if self.loading {
                debug!(?target, "seek queued until media is ready");
                self.pending_seek = Some(target);
                self.publish_position(target);
            } else {
                debug!(?target, "seek ignored: nothing loaded");
            }
            return;
        };

        // Rebuild the sink at the target offset, like a scrub.
        self.discard_sink();
        match self.output.open_sink(&media, target) {
            Ok(sink) => {
                if self.playing {
                    sink.play();
                }
                self.sink = Some(sink);
                self.seek_base = target;
                self.publish_position(target);
            }
            Err(e) => {
                warn!(error = %e, "seek failed");
                self.playing = false;
                self.notify(EngineEvent::Error(e.to_string()));
            }
        }
    }

    /// Periodic refresh of the playhead plus end-of-stream detection.
    pub(super) fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let ended = match self.sink {
            Some(ref sink) => sink.empty(),
            None => return,
        };
        self.publish_position(self.playhead());

        if ended {
            debug!(load = self.load, "end of stream");
            self.playing = false;
            self.discard_sink();
            self.media = None;
            self.notify(EngineEvent::Ended);
            self.notify(EngineEvent::PlayingChanged(false));
        }
    }

    fn playhead(&self) -> Duration {
        self.seek_base + self.sink.as_ref().map_or(Duration::ZERO, |s| s.position())
    }

    fn publish_position(&self, position: Duration) {
        if let Ok(mut p) = self.position.lock() {
            *p = position;
        }
    }

    fn discard_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
