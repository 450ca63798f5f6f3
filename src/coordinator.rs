//! Playback coordinator: owner of the UI-facing [`PlayerState`].
//!
//! UI intents arrive as method calls on [`Coordinator`]; everything
//! asynchronous (engine notifications, catalog completions, polling ticks)
//! arrives as an [`Inbound`] message and goes through [`Coordinator::handle`].
//! Each mutation publishes a fresh immutable snapshot.

mod inbox;
mod model;
mod poller;
mod sort;
mod state;
mod store;

pub use inbox::Inbound;
pub use model::Coordinator;
pub use state::*;
