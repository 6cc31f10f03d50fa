//! Diagnostic logging setup.
//!
//! Diagnostics go to an append-only log file at the configured level. The
//! console only receives diagnostics when `-v` is given, so a normal run's
//! stdout/stderr stays limited to the report or a single error line.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Open `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Console filter for a `-v` count; `None` keeps the console quiet
pub fn console_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install the global subscriber.
pub fn init_tracing(log_level: &str, verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let filter = EnvFilter::try_new(log_level)
                .with_context(|| format!("Invalid log level '{log_level}'"))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(filter),
            )
        }
        None => None,
    };

    let console_layer = match console_level(verbose) {
        Some(level) => Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose >= 2)
                .with_line_number(verbose >= 3)
                .with_filter(EnvFilter::try_new(level)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
