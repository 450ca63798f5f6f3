use std::net::IpAddr;
use std::{env, path::PathBuf};

use super::error::SettingsError;
use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `JAMPLAY__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("JAMPLAY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.playback.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "playback.poll_interval_ms must be >= 1".to_string(),
            ));
        }
        if self.catalog.limit == 0 {
            return Err(SettingsError::Invalid(
                "catalog.limit must be >= 1".to_string(),
            ));
        }
        if self.catalog.client_id.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "catalog.client_id must not be empty".to_string(),
            ));
        }
        if self.connectivity.host.trim().parse::<IpAddr>().is_err() {
            return Err(SettingsError::Invalid(format!(
                "connectivity.host must be an IP address, got {:?}",
                self.connectivity.host
            )));
        }
        Ok(())
    }

    /// Where logs go: the configured file or the XDG state default.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(default_log_path)
    }
}

/// Resolve the config path from `JAMPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("JAMPLAY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/jamplay/config.toml`
/// or `~/.config/jamplay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("jamplay").join("config.toml"))
}

/// `$XDG_STATE_HOME/jamplay/jamplay.log` or `~/.local/state/jamplay/jamplay.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("jamplay").join("jamplay.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var).filter(|v| !v.is_empty()) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
