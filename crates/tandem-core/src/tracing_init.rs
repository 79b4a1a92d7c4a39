//! Shared tracing/logging initialization.
//!
//! Interactive commands draw on the terminal, so their logs go to a file under
//! the logs directory; everything else logs to stderr.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::env::{EnvSnapshot, LOG_FILTER_VAR};

/// Log file name inside the logs directory.
pub const LOG_FILE_NAME: &str = "tandem.log";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `<dir>/tandem.log`.
    File(PathBuf),
}

fn open_log_file(dir: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}

/// `RUST_LOG` from the snapshot, or `default_filter` when unset.
pub fn filter_directives<'a>(env: &'a EnvSnapshot, default_filter: &'a str) -> &'a str {
    env.get(LOG_FILTER_VAR).unwrap_or(default_filter)
}

/// Initialise the global tracing subscriber.
///
/// * `filter` -- `EnvFilter` directives (e.g. `"tandem_cli=info"`), usually
///   `RUST_LOG` from the environment snapshot or a default.
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
/// * `target` -- stderr or a log file; falls back to stderr if the file
///   cannot be opened.
pub fn init_tracing(filter: &str, log_json: bool, target: &LogTarget) {
    let env_filter = tracing_subscriber::EnvFilter::new(filter);

    let file = match target {
        LogTarget::Stderr => None,
        LogTarget::File(dir) => open_log_file(dir).ok(),
    };

    match (file, log_json) {
        (Some(file), true) => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        (Some(file), false) => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        (None, true) => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        (None, false) => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
