//! Log backend setup.
//!
//! The terminal belongs to the ASCII view while running, so log records
//! go to a file. Without a file no subscriber is installed and the `log`
//! macros are no-ops. Records from the `log` facade reach the subscriber
//! through its log bridge.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Errors while installing the logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log level: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Logger already installed: {0}")]
    Install(String),
}

/// Install a file-backed subscriber.
///
/// `level` is the default filter (e.g. `info`, `ascii_gesture=debug`);
/// a valid `RUST_LOG` overrides it.
///
/// # Returns
/// Whether a subscriber was installed.
pub fn init(file: Option<&Path>, level: &str) -> Result<bool, LoggingError> {
    let Some(path) = file else {
        return Ok(false);
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    let target = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggingError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(target))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(true)
}
