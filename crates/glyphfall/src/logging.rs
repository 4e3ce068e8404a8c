//! File logging.
//!
//! The terminal is owned by the UI, so logs go to a file in the data
//! directory. Filter with `GLYPHFALL_LOG` (defaults to `info`).

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "GLYPHFALL_LOG";

pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match open_log_file() {
        Some((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "logging initialized");
        }
        // No log file: stay silent rather than write over the UI.
        None => tracing_subscriber::registry().with(env_filter).init(),
    }
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let dirs = ProjectDirs::from("dev", "glyphfall", "glyphfall")?;
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir).ok()?;
    let path = dir.join("glyphfall.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    Some((path, file))
}
