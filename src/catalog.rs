//! Remote track catalog.
//!
//! The catalog is fetched with a single request against a fixed endpoint and
//! deserialized into [`Track`] records. Callers only see the [`CatalogClient`]
//! trait so the coordinator can be driven by a fake in tests.

mod jamendo;
mod model;

pub use jamendo::JamendoClient;
pub use model::*;

#[cfg(test)]
mod tests;
