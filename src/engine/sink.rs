//! Helpers to fetch media bytes and build `rodio` sinks from them.
//!
//! Downloaded media is kept as a shared byte buffer so a seek can rebuild the
//! sink without fetching the track again. The audio thread only sees the
//! [`Output`] and [`PlaybackSink`] traits; `rodio` implements both here.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

pub(super) type Media = Arc<[u8]>;

/// Fetches a whole media resource; runs on a helper thread.
pub(super) type Fetch = Arc<dyn Fn(&str) -> Result<Media, EngineError> + Send + Sync>;

/// Something that can turn decoded media into a playable sink.
pub(super) trait Output {
    type Sink: PlaybackSink;

    /// Build a paused sink for `media` that starts at `start_at`.
    fn open_sink(&self, media: &Media, start_at: Duration) -> Result<Self::Sink, EngineError>;
}

/// The handful of sink controls the audio thread needs.
pub(super) trait PlaybackSink {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    /// Everything appended has been played.
    fn empty(&self) -> bool;
    /// Time played since the sink was built.
    fn position(&self) -> Duration;
}

impl Output for OutputStream {
    type Sink = Sink;

    fn open_sink(&self, media: &Media, start_at: Duration) -> Result<Sink, EngineError> {
        create_sink_at(self, media, start_at)
    }
}

impl PlaybackSink for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn empty(&self) -> bool {
        Sink::empty(self)
    }

    fn position(&self) -> Duration {
        self.get_pos()
    }
}

/// Downloads over `http`.
pub(super) fn http_fetch(http: Client) -> Fetch {
    Arc::new(move |uri| download(&http, uri))
}

/// Fetch the whole media resource at `uri`.
pub(super) fn download(http: &Client, uri: &str) -> Result<Media, EngineError> {
    let response = http
        .get(uri)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| EngineError::Download(e.to_string()))?;

    let bytes = response
        .bytes()
        .map_err(|e| EngineError::Download(e.to_string()))?;

    Ok(Arc::from(bytes.as_ref()))
}

/// Probe and open a decoder over `media`.
pub(super) fn decode(media: &Media) -> Result<Decoder<Cursor<Media>>, EngineError> {
    Decoder::new(Cursor::new(Arc::clone(media))).map_err(|e| EngineError::Decode(e.to_string()))
}

/// Create a paused `Sink` for `media` that starts playback at `start_at`.
fn create_sink_at(
    stream: &OutputStream,
    media: &Media,
    start_at: Duration,
) -> Result<Sink, EngineError> {
    // `skip_duration` is the seeking primitive; Duration::ZERO is a no-op.
    let source = decode(media)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
