use serde::Deserialize;
use thiserror::Error;

/// A streamable track as published by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "artist_name")]
    pub artist: String,
    /// Length in whole seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u32,
    #[serde(rename = "image", default)]
    pub thumbnail: String,
    #[serde(rename = "audio")]
    pub audio_url: String,
}

/// Errors produced while fetching or decoding the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("catalog service reported an error: {0}")]
    Service(String),

    #[error("malformed catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce the ordered track list.
///
/// Implementations are called from a worker thread, hence the bounds.
pub trait CatalogClient: Send + Sync + 'static {
    fn fetch_tracks(&self) -> Result<Vec<Track>, CatalogError>;
}
