//! Media engine: the playback backend the coordinator drives.
//!
//! The coordinator only sees [`MediaEngine`] plus the [`EngineEvent`]s an
//! engine posts through its [`EngineNotifier`]. [`RodioEngine`] is the real
//! backend: an audio thread that downloads a track, decodes it with `rodio`
//! and reports buffering/ready/playing/ended/error transitions.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioEngine;
pub use types::*;

#[cfg(test)]
mod tests;
