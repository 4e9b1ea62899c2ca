//! Error types for source fetch and parse operations.
//!
//! A [`SourceError`] never aborts a run: the aggregator logs it, records it in
//! the report and moves on to the next source.

use std::fmt;
use thiserror::Error;

/// The category of a source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// Connection failed, DNS resolution, body read failure.
    NetworkError,
    /// The request did not finish within the configured timeout.
    Timeout,
    /// The server answered with a non-success status.
    HttpStatus,
    /// The payload could not be parsed into records.
    InvalidResponse,
    /// A configured source URL is not a valid absolute URL.
    InvalidUrl,
    /// Unexpected state.
    InternalError,
}

impl SourceErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::InvalidResponse => "invalid_response",
            Self::InvalidUrl => "invalid_url",
            Self::InternalError => "internal_error",
        }
    }

}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while fetching or parsing one source.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// Name of the source that failed (usually its URL).
    source_name: Option<String>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            cause: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Timeout, message)
    }

    pub fn http_status(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::HttpStatus, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidResponse, message)
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidUrl, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InternalError, message)
    }

    /// Sets the name of the failing source.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "[{}] ", name)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
