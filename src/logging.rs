// src/logging.rs

//! Diagnostic logging via `tracing` + `tracing-subscriber`.
//!
//! This is developer-facing output, distinct from the host output window
//! (`Host::msg`). Level resolution: the `--log-level` flag wins, then the
//! `QSCRIPTS_LOG` environment variable, then `info`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = cli_level
        .map(Level::from)
        .or_else(|| {
            std::env::var("QSCRIPTS_LOG")
                .ok()
                .and_then(|value| value.trim().parse().ok())
        })
        .unwrap_or(Level::INFO);

    fmt().with_max_level(level).with_target(true).init();

    Ok(())
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
