//! Cancellable repeating task that asks the coordinator to sample the playhead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::inbox::Inbound;

/// At most one ticker runs at a time. Ticks carry the generation they were
/// started with, and only ticks from the live generation are accepted, so a
/// tick already queued by a cancelled ticker is harmless.
pub(super) struct PositionPoller {
    interval: Duration,
    generation: u64,
    running: Option<Arc<AtomicBool>>,
}

impl PositionPoller {
    pub(super) fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            running: None,
        }
    }

    /// Cancel any live ticker, then start a new one posting to `inbox`.
    pub(super) fn start(&mut self, inbox: &Sender<Inbound>) {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let interval = self.interval;
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let tx = inbox.clone();

        let spawned = thread::Builder::new()
            .name("jamplay-position".to_string())
            .spawn(move || {
                while flag.load(Ordering::Acquire) {
                    if tx.send(Inbound::PositionTick { generation }).is_err() {
                        break;
                    }
                    thread::sleep(interval);
                }
            });

        match spawned {
            Ok(_) => {
                debug!(generation, "position polling started");
                self.running = Some(running);
            }
            Err(e) => warn!(error = %e, "could not start position polling"),
        }
    }

    pub(super) fn cancel(&mut self) {
        if let Some(flag) = self.running.take() {
            flag.store(false, Ordering::Release);
            debug!(generation = self.generation, "position polling cancelled");
        }
    }

    pub(super) fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// Whether a tick from `generation` belongs to the live ticker.
    pub(super) fn accepts(&self, generation: u64) -> bool {
        self.is_active() && generation == self.generation
    }
}

impl Drop for PositionPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}
