//! Copy-on-write holder for the current [`PlayerState`].

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use super::state::PlayerState;

/// Owns the current snapshot and pushes every new one to subscribers.
///
/// Updates clone the current state, apply the change and swap the `Arc`, so a
/// reader holding an older snapshot never sees a half-applied mutation.
pub(super) struct StateStore {
    current: Arc<PlayerState>,
    subscribers: Vec<Sender<Arc<PlayerState>>>,
}

impl StateStore {
    pub(super) fn new(initial: PlayerState) -> Self {
        Self {
            current: Arc::new(initial),
            subscribers: Vec::new(),
        }
    }

    pub(super) fn snapshot(&self) -> Arc<PlayerState> {
        Arc::clone(&self.current)
    }

    /// Subscribe to future snapshots; the current one is delivered first.
    pub(super) fn subscribe(&mut self) -> Receiver<Arc<PlayerState>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.snapshot());
        self.subscribers.push(tx);
        rx
    }

    /// Apply `f` to a copy of the state and publish it if anything changed.
    pub(super) fn update(&mut self, f: impl FnOnce(&mut PlayerState)) {
        let mut next = (*self.current).clone();
        f(&mut next);
        if next == *self.current {
            return;
        }

        self.current = Arc::new(next);
        let snapshot = &self.current;
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(snapshot)).is_ok());
    }
}
