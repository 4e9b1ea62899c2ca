//! Log output for generation runs.
//!
//! Logs go to stderr; stdout carries the run summary. `RUST_LOG` always wins
//! over the level picked from the command line.
//!
//! ```ignore
//! use tapahtumat_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::from_flags(debug, json_logs))?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber was already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// How log lines are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One human-readable line per event.
    #[default]
    Compact,
    /// One JSON object per line, for scheduled CI runs.
    Json,
}

/// Logging setup for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the `tapahtumat*` crates when `RUST_LOG` is unset.
    pub level: Level,
    pub format: LogFormat,
    /// Adds module path, file and line; drops timestamps.
    pub verbose: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            verbose: false,
        }
    }
}

impl TracingConfig {
    /// Per-record decisions (rejected drafts, date fallbacks) with locations.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Compact,
            verbose: true,
        }
    }

    /// JSON lines for unattended runs.
    #[must_use]
    pub fn ci() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            verbose: false,
        }
    }

    /// Picks the preset for the `--debug` and `--json-logs` flags.
    /// `debug` wins when both are set.
    #[must_use]
    pub fn from_flags(debug: bool, json_logs: bool) -> Self {
        match (debug, json_logs) {
            (true, _) => Self::cli_debug(),
            (false, true) => Self::ci(),
            (false, false) => Self::default(),
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> String {
        format!("tapahtumat={}", self.level)
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Fails when a global subscriber has already been set.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.verbose)
        .with_line_number(config.verbose)
        .with_target(config.verbose);

    let layer = match (config.format, config.verbose) {
        (LogFormat::Json, _) => layer.json().boxed(),
        (LogFormat::Compact, true) => layer.compact().without_time().boxed(),
        (LogFormat::Compact, false) => layer.compact().boxed(),
    };

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(layer))?;
    Ok(())
}
