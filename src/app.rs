//! Application module: exposes the app model used by the TUI and runtime.
//!
//! `App` pairs the latest `PlayerState` snapshot with cursor and popup state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
