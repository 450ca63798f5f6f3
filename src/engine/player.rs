use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::config::PlaybackSettings;

use super::sink::http_fetch;
use super::thread::spawn_engine_thread;
use super::types::{EngineCmd, EngineError, EngineNotifier, MediaEngine, PositionHandle};

/// `rodio`-backed engine: a handle to the audio thread.
pub struct RodioEngine {
    tx: Option<Sender<EngineCmd>>,
    position: PositionHandle,
    join: Option<JoinHandle<()>>,
    /// Id handed to the most recent load.
    loads: u64,
}

impl RodioEngine {
    /// Open the default output device and start the audio thread.
    pub fn new(notifier: EngineNotifier, settings: &PlaybackSettings) -> Result<Self, EngineError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.download_timeout_secs))
            .build()
            .map_err(|e| EngineError::Download(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let position: PositionHandle = Arc::new(Mutex::new(Duration::ZERO));
        let join = spawn_engine_thread(rx, tx.clone(), position.clone(), notifier, http_fetch(http))?;
        info!("audio engine started");

        Ok(Self {
            tx: Some(tx),
            position,
            join: Some(join),
            loads: 0,
        })
    }

    fn send(&self, cmd: EngineCmd) {
        match self.tx {
            Some(ref tx) => {
                if tx.send(cmd).is_err() {
                    warn!("audio thread is gone; command dropped");
                }
            }
            None => debug!(?cmd, "command after release ignored"),
        }
    }
}

impl MediaEngine for RodioEngine {
    fn load(&mut self, uri: &str) {
        self.loads += 1;
        self.send(EngineCmd::Load {
            uri: uri.to_string(),
            load: self.loads,
        });
    }

    fn current_load(&self) -> u64 {
        self.loads
    }

    fn play(&mut self) {
        self.send(EngineCmd::Play);
    }

    fn pause(&mut self) {
        self.send(EngineCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(EngineCmd::Stop);
    }

    fn seek(&mut self, position: Duration) {
        self.send(EngineCmd::Seek(position));
    }

    fn current_position(&self) -> Result<Duration, EngineError> {
        if self.tx.is_none() {
            return Err(EngineError::Released);
        }
        Ok(*self.position.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn release(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let _ = tx.send(EngineCmd::Quit);

        if let Some(handle) = self.join.take() {
            if handle.join().is_err() {
                warn!("audio thread panicked before release");
            }
        }
        info!("audio engine released");
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.release();
    }
}
