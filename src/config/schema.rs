use std::path::PathBuf;

use serde::Deserialize;

use crate::coordinator::SortMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jamplay/config.toml` or `~/.config/jamplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JAMPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub connectivity: ConnectivitySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Root of the Jamendo API, without the `/tracks/` suffix.
    pub base_url: String,
    /// Jamendo application client id.
    pub client_id: String,
    /// Number of tracks requested per fetch.
    pub limit: u32,
    /// Whole-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.jamendo.com/v3.0".to_string(),
            client_id: "88c0572f".to_string(),
            limit: 20,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectivitySettings {
    /// IP literal the route check targets; hostnames are rejected.
    pub host: String,
    pub port: u16,
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            host: "1.1.1.1".to_string(),
            port: 443,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the playhead is sampled while playing (milliseconds).
    pub poll_interval_ms: u64,
    /// Timeout for downloading one track's audio (seconds).
    pub download_timeout_secs: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            download_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Whether the track list shows "Artist - Title" or only the title.
    pub show_artist: bool,

    /// Sort order applied before the first fetch.
    pub initial_sort: SortModeSetting,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ jamplay: free music from Jamendo ~ ".to_string(),
            show_artist: true,
            initial_sort: SortModeSetting::None,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortModeSetting {
    #[default]
    #[serde(alias = "off", alias = "fetch", alias = "fetch-order")]
    None,
    #[serde(
        alias = "name",
        alias = "title",
        alias = "by_name",
        alias = "byname"
    )]
    ByName,
    #[serde(
        alias = "duration",
        alias = "length",
        alias = "by_duration",
        alias = "byduration"
    )]
    ByDuration,
}

impl From<SortModeSetting> for SortMode {
    fn from(setting: SortModeSetting) -> Self {
        match setting {
            SortModeSetting::None => SortMode::None,
            SortModeSetting::ByName => SortMode::ByName,
            SortModeSetting::ByDuration => SortMode::ByDuration,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. `None` means the XDG state location.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
