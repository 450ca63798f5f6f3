//! Configuration loader and schema types.
//!
//! `Settings` is layered from environment, an optional TOML file and struct
//! defaults; every runtime component reads its own section.

mod error;
mod load;
mod schema;

pub use error::SettingsError;
pub use schema::*;
