use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::blocking::Client;

use super::sink::{decode, download, Fetch, Media, Output, PlaybackSink};
use super::thread::AudioState;
use super::*;
use crate::coordinator::Inbound;

const WAIT: Duration = Duration::from_secs(5);

/// What the fake output has been asked to do, shared with every sink it builds.
#[derive(Default)]
struct Deck {
    opened: Mutex<Vec<Duration>>,
    playing: AtomicBool,
    finished: AtomicBool,
    elapsed: Mutex<Duration>,
}

impl Deck {
    fn opened(&self) -> Vec<Duration> {
        self.opened.lock().unwrap().clone()
    }

    fn set_elapsed(&self, elapsed: Duration) {
        *self.elapsed.lock().unwrap() = elapsed;
    }
}

struct FakeOutput(Arc<Deck>);

struct FakeSink(Arc<Deck>);

impl Output for FakeOutput {
    type Sink = FakeSink;

    fn open_sink(&self, media: &Media, start_at: Duration) -> Result<FakeSink, EngineError> {
        if media.starts_with(b"corrupt") {
            return Err(EngineError::Decode("no audio stream".into()));
        }
        self.0.opened.lock().unwrap().push(start_at);
        self.0.set_elapsed(Duration::ZERO);
        Ok(FakeSink(self.0.clone()))
    }
}

impl PlaybackSink for FakeSink {
    fn play(&self) {
        self.0.playing.store(true, Ordering::SeqCst);
    }

    fn pause(&self) {
        self.0.playing.store(false, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.0.playing.store(false, Ordering::SeqCst);
    }

    fn empty(&self) -> bool {
        self.0.finished.load(Ordering::SeqCst)
    }

    fn position(&self) -> Duration {
        *self.0.elapsed.lock().unwrap()
    }
}

/// Media is the uri itself; `missing` uris fail to download.
fn fake_fetch(uri: &str) -> Result<Media, EngineError> {
    if uri == "missing" {
        Err(EngineError::Download("404 Not Found".into()))
    } else {
        Ok(Arc::from(uri.as_bytes()))
    }
}

struct Rig {
    state: AudioState<FakeOutput>,
    cmds: Receiver<EngineCmd>,
    inbox: Receiver<Inbound>,
    position: PositionHandle,
    deck: Arc<Deck>,
}

impl Rig {
    fn new() -> Self {
        let (cmd_tx, cmds) = mpsc::channel();
        let (tx, inbox) = mpsc::channel();
        let position: PositionHandle = Arc::new(Mutex::new(Duration::ZERO));
        let deck = Arc::new(Deck::default());
        let fetch: Fetch = Arc::new(fake_fetch);

        let state = AudioState::new(
            FakeOutput(deck.clone()),
            fetch,
            cmd_tx,
            EngineNotifier::new(tx),
            position.clone(),
        );

        Self {
            state,
            cmds,
            inbox,
            position,
            deck,
        }
    }

    fn load(&mut self, uri: &str, load: u64) {
        self.state.handle(EngineCmd::Load {
            uri: uri.to_string(),
            load,
        });
    }

    /// Wait for the download thread's result without applying it.
    fn next_download(&self) -> EngineCmd {
        self.cmds.recv_timeout(WAIT).expect("download result")
    }

    fn finish_download(&mut self) {
        let cmd = self.next_download();
        self.state.handle(cmd);
    }

    /// Load, request playback and let the download land.
    fn playing(uri: &str) -> Self {
        let mut rig = Self::new();
        rig.load(uri, 1);
        rig.state.handle(EngineCmd::Play);
        rig.finish_download();
        rig.events();
        rig
    }

    fn events(&self) -> Vec<(u64, EngineEvent)> {
        self.inbox
            .try_iter()
            .filter_map(|msg| match msg {
                Inbound::Engine { load, event } => Some((load, event)),
                _ => None,
            })
            .collect()
    }

    fn position(&self) -> Duration {
        *self.position.lock().unwrap()
    }
}

#[test]
fn notifier_posts_engine_events_to_the_inbox() {
    let (tx, rx) = mpsc::channel::<Inbound>();
    let notifier = EngineNotifier::new(tx);

    notifier.notify(3, EngineEvent::BufferingStarted);
    notifier.notify(3, EngineEvent::PlayingChanged(true));

    let got: Vec<(u64, EngineEvent)> = rx
        .try_iter()
        .filter_map(|msg| match msg {
            Inbound::Engine { load, event } => Some((load, event)),
            _ => None,
        })
        .collect();
    assert_eq!(
        got,
        vec![
            (3, EngineEvent::BufferingStarted),
            (3, EngineEvent::PlayingChanged(true))
        ]
    );
}

#[test]
fn notifier_tolerates_a_closed_inbox() {
    let (tx, rx) = mpsc::channel::<Inbound>();
    drop(rx);
    EngineNotifier::new(tx).notify(1, EngineEvent::Idle);
}

#[test]
fn load_then_play_reports_buffering_ready_playing() {
    let mut rig = Rig::new();
    rig.load("track-a", 1);
    rig.state.handle(EngineCmd::Play);
    assert_eq!(rig.events(), vec![(1, EngineEvent::BufferingStarted)]);
    assert!(rig.deck.opened().is_empty());

    rig.finish_download();

    assert_eq!(
        rig.events(),
        vec![(1, EngineEvent::Ready), (1, EngineEvent::PlayingChanged(true))]
    );
    assert_eq!(rig.deck.opened(), vec![Duration::ZERO]);
    assert!(rig.deck.playing.load(Ordering::SeqCst));
}

#[test]
fn ready_without_play_stays_paused() {
    let mut rig = Rig::new();
    rig.load("track-a", 1);
    rig.finish_download();

    assert_eq!(
        rig.events(),
        vec![(1, EngineEvent::BufferingStarted), (1, EngineEvent::Ready)]
    );
    assert!(!rig.deck.playing.load(Ordering::SeqCst));
}

#[test]
fn end_of_stream_reports_ended_then_not_playing() {
    let mut rig = Rig::playing("track-a");

    rig.deck.set_elapsed(Duration::from_secs(3));
    rig.state.tick();
    assert_eq!(rig.position(), Duration::from_secs(3));
    assert!(rig.events().is_empty());

    rig.deck.finished.store(true, Ordering::SeqCst);
    rig.state.tick();
    assert_eq!(
        rig.events(),
        vec![(1, EngineEvent::Ended), (1, EngineEvent::PlayingChanged(false))]
    );

    rig.state.tick();
    assert!(rig.events().is_empty());
}

#[test]
fn stop_reports_idle_only_when_something_was_loaded() {
    let mut rig = Rig::new();
    rig.state.handle(EngineCmd::Stop);
    assert!(rig.events().is_empty());

    let mut rig = Rig::playing("track-a");
    rig.deck.set_elapsed(Duration::from_secs(8));
    rig.state.handle(EngineCmd::Stop);

    assert_eq!(
        rig.events(),
        vec![(1, EngineEvent::PlayingChanged(false)), (1, EngineEvent::Idle)]
    );
    assert_eq!(rig.position(), Duration::ZERO);
    assert!(!rig.deck.playing.load(Ordering::SeqCst));

    rig.state.handle(EngineCmd::Stop);
    assert!(rig.events().is_empty());
}

#[test]
fn pause_publishes_the_playhead() {
    let mut rig = Rig::playing("track-a");
    rig.deck.set_elapsed(Duration::from_secs(12));

    rig.state.handle(EngineCmd::Pause);

    assert_eq!(rig.events(), vec![(1, EngineEvent::PlayingChanged(false))]);
    assert_eq!(rig.position(), Duration::from_secs(12));
    assert!(!rig.deck.playing.load(Ordering::SeqCst));

    rig.state.handle(EngineCmd::Pause);
    assert!(rig.events().is_empty());
}

#[test]
fn seek_rebuilds_the_sink_at_the_target() {
    let mut rig = Rig::playing("track-a");
    rig.deck.set_elapsed(Duration::from_secs(2));

    rig.state.handle(EngineCmd::Seek(Duration::from_secs(40)));

    assert_eq!(
        rig.deck.opened(),
        vec![Duration::ZERO, Duration::from_secs(40)]
    );
    assert_eq!(rig.position(), Duration::from_secs(40));
    assert!(rig.deck.playing.load(Ordering::SeqCst));
    assert!(rig.events().is_empty());

    rig.deck.set_elapsed(Duration::from_secs(2));
    rig.state.tick();
    assert_eq!(rig.position(), Duration::from_secs(42));
}

#[test]
fn seek_while_buffering_starts_at_the_target() {
    let mut rig = Rig::new();
    rig.load("track-a", 1);
    rig.state.handle(EngineCmd::Play);

    rig.state.handle(EngineCmd::Seek(Duration::from_secs(30)));
    assert_eq!(rig.position(), Duration::from_secs(30));
    assert!(rig.deck.opened().is_empty());

    rig.finish_download();
    assert_eq!(rig.deck.opened(), vec![Duration::from_secs(30)]);
    assert_eq!(rig.position(), Duration::from_secs(30));

    rig.deck.set_elapsed(Duration::from_secs(1));
    rig.state.tick();
    assert_eq!(rig.position(), Duration::from_secs(31));
}

#[test]
fn seek_with_nothing_loaded_is_ignored() {
    let mut rig = Rig::new();
    rig.state.handle(EngineCmd::Seek(Duration::from_secs(30)));
    assert_eq!(rig.position(), Duration::ZERO);

    // A queued seek does not outlive the load it was made for.
    rig.load("track-a", 1);
    rig.state.handle(EngineCmd::Seek(Duration::from_secs(30)));
    rig.state.handle(EngineCmd::Stop);
    rig.load("track-b", 2);
    // Both downloads land; only the second one is current.
    rig.finish_download();
    rig.finish_download();
    assert_eq!(rig.deck.opened(), vec![Duration::ZERO]);
}

#[test]
fn loading_over_a_playing_track_tags_each_side_with_its_own_load() {
    let mut rig = Rig::playing("track-a");

    rig.load("track-b", 2);

    assert_eq!(
        rig.events(),
        vec![
            (1, EngineEvent::PlayingChanged(false)),
            (2, EngineEvent::BufferingStarted)
        ]
    );
}

#[test]
fn superseded_download_is_dropped() {
    let mut rig = Rig::new();
    rig.load("track-a", 1);
    let stale = rig.next_download();
    rig.load("track-b", 2);
    rig.events();

    rig.state.handle(stale);
    assert!(rig.events().is_empty());
    assert!(rig.deck.opened().is_empty());

    rig.finish_download();
    assert_eq!(rig.events(), vec![(2, EngineEvent::Ready)]);
}

#[test]
fn failed_download_reports_an_error() {
    let mut rig = Rig::new();
    rig.load("missing", 1);
    rig.state.handle(EngineCmd::Play);
    rig.finish_download();

    assert_eq!(
        rig.events(),
        vec![
            (1, EngineEvent::BufferingStarted),
            (
                1,
                EngineEvent::Error("download failed: 404 Not Found".into())
            )
        ]
    );
    assert!(!rig.deck.playing.load(Ordering::SeqCst));
}

#[test]
fn undecodable_media_reports_an_error() {
    let mut rig = Rig::new();
    rig.load("corrupt-track", 1);
    rig.finish_download();

    let events = rig.events();
    assert!(matches!(
        events.last(),
        Some((1, EngineEvent::Error(detail))) if detail.starts_with("could not decode media")
    ));
    assert!(rig.deck.opened().is_empty());
}

#[test]
fn download_from_refused_port_is_a_download_error() {
    let http = Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = download(&http, &format!("http://127.0.0.1:{port}/track.mp3")).unwrap_err();
    assert!(matches!(err, EngineError::Download(_)));
}

#[test]
fn decode_rejects_bytes_that_are_not_audio() {
    let media: Arc<[u8]> = Arc::from(&b"definitely not an mp3 stream"[..]);
    assert!(matches!(decode(&media), Err(EngineError::Decode(_))));
}

#[test]
fn engine_errors_render_their_detail() {
    assert_eq!(
        EngineError::Download("404 Not Found".into()).to_string(),
        "download failed: 404 Not Found"
    );
    assert_eq!(
        EngineError::Released.to_string(),
        "media engine has been released"
    );
}
