//! Catalog client for the Jamendo v3 `tracks` endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CatalogSettings;

use super::model::{CatalogClient, CatalogError, Track};

const USER_AGENT: &str = concat!("jamplay/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    headers: Option<EnvelopeHeaders>,
    #[serde(default)]
    results: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeHeaders {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: String,
}

pub struct JamendoClient {
    http: Client,
    endpoint: String,
}

impl JamendoClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            endpoint: tracks_endpoint(settings),
        })
    }
}

impl CatalogClient for JamendoClient {
    fn fetch_tracks(&self) -> Result<Vec<Track>, CatalogError> {
        debug!(endpoint = %self.endpoint, "requesting catalog");
        let response = self.http.get(&self.endpoint).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.text()?;
        let tracks = parse_envelope(&body)?;
        info!(count = tracks.len(), "catalog received");
        Ok(tracks)
    }
}

/// Build the `tracks` URL from the catalog settings.
pub(super) fn tracks_endpoint(settings: &CatalogSettings) -> String {
    format!(
        "{}/tracks/?client_id={}&format=json&limit={}",
        settings.base_url.trim_end_matches('/'),
        settings.client_id,
        settings.limit
    )
}

/// Decode the `{ "headers": ..., "results": [...] }` envelope.
///
/// Jamendo answers bad client ids with HTTP 200 and `headers.status = "failed"`,
/// so that case is surfaced as an error instead of an empty catalog.
pub(super) fn parse_envelope(body: &str) -> Result<Vec<Track>, CatalogError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(headers) = envelope.headers {
        if headers.status.eq_ignore_ascii_case("failed") {
            return Err(CatalogError::Service(headers.error_message));
        }
    }

    Ok(envelope.results)
}
