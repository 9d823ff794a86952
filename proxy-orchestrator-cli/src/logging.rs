//! Logging setup: human-readable stderr plus a JSON log file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_NAME: &str = "proxy_orchestrator.log";

/// Install the global subscriber and return the log file path.
///
/// `log` records from the library crates are forwarded into tracing.
pub fn init(log_dir: &Path, verbose: bool) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .context("logging already initialized")?;

    Ok(path)
}
