use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config;

/// Install the global subscriber writing to the configured log file.
///
/// The terminal belongs to the TUI, so when the file cannot be opened logging
/// stays off. Returns the path being written to.
pub fn init(settings: &config::Settings) -> Option<PathBuf> {
    let path = settings.log_path()?;
    let file = open_log_file(&path).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&settings.logging.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;

    Some(path)
}

/// `RUST_LOG` when set, else the configured level, else `info`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
