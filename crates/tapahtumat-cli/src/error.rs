//! CLI error types.

use tapahtumat_core::{RenderError, TracingError};
use tapahtumat_sources::SourceError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a run with a non-zero exit status.
///
/// Source failures are not among them; they degrade the run instead.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unreadable, malformed or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing the configuration or an artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Logging could not be installed.
    #[error("tracing setup failed: {0}")]
    Tracing(#[from] TracingError),

    /// The shared HTTP client could not be built.
    #[error("source setup failed: {0}")]
    Source(#[from] SourceError),
}
