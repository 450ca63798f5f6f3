use crate::config;

/// Load settings, falling back to defaults on any failure.
///
/// Logging is not up yet when this runs and the terminal will soon belong to
/// the TUI, so the reason for a fallback is handed back to be logged later.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => (s, None),
        Err(e) => (
            config::Settings::default(),
            Some(format!("{e}; using defaults")),
        ),
    }
}
