//! Tracing setup.
//!
//! The terminal belongs to the UI, so events are written to a log file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Settings;

/// Where log lines go: `logging.file`, else `earshot.log` in the data dir.
pub fn log_path(settings: &Settings) -> Option<PathBuf> {
    settings
        .logging
        .file
        .clone()
        .or_else(|| settings.data_dir().map(|d| d.join("earshot.log")))
}

/// Filter directive from `logging.level`, with noisy dependencies capped.
fn filter_directive(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("{level},symphonia=warn,lofty=warn")
}

/// Install the global subscriber. Logging is optional: when the file cannot
/// be opened the game runs without it.
pub fn init(settings: &Settings) -> Option<PathBuf> {
    let path = log_path(settings)?;
    let file = match open_log(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("earshot: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&settings.logging.level)));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init();
    installed.ok().map(|_| path)
}

fn open_log(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
