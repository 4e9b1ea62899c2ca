//! EventSource trait definition.
//!
//! Every adapter (JSON API, RSS/Atom feed, scraped page, built-in events)
//! implements [`EventSource`]. The aggregator drives them through trait
//! objects in a fixed order and never lets one source's failure reach
//! another.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::draft::EventDraft;
use crate::error::{SourceError, SourceResult};
use crate::http::HttpFetcher;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so sources can be stored as
/// `Box<dyn EventSource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What kind of adapter a source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    JsonApi,
    Feed,
    Scrape,
    Fallback,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonApi => "json_api",
            Self::Feed => "feed",
            Self::Scrape => "scrape",
            Self::Fallback => "fallback",
        }
    }

    /// Position in a run; lower runs first.
    pub fn run_order(&self) -> u8 {
        match self {
            Self::JsonApi => 0,
            Self::Feed => 1,
            Self::Scrape => 2,
            Self::Fallback => 3,
        }
    }

    /// Whether drafts from this kind go through the validity filter.
    ///
    /// Feeds and built-in events are trusted.
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::JsonApi | Self::Scrape)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A producer of event drafts.
///
/// # Example Implementation
///
/// ```ignore
/// struct MySource { url: Url }
///
/// impl EventSource for MySource {
///     fn name(&self) -> &str { self.url.as_str() }
///     fn kind(&self) -> SourceKind { SourceKind::Feed }
///
///     fn fetch_drafts<'a>(&'a self, http: &'a HttpFetcher) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>> {
///         Box::pin(async move {
///             let body = http.get_bytes(&self.url).await?;
///             parse_feed(&body)
///         })
///     }
/// }
/// ```
pub trait EventSource: Send + Sync {
    /// Identifies the source in logs and reports (usually its URL).
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Fetches and parses the source.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the source is unreachable or its payload
    /// cannot be read as a whole. Individual bad records are skipped, not
    /// reported as errors.
    fn fetch_drafts<'a>(
        &'a self,
        http: &'a HttpFetcher,
    ) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>>;
}

/// A source that always fails.
///
/// Stands in for a configured source that could not be set up (e.g. a
/// malformed URL) so the failure still shows up in the run report.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    kind: SourceKind,
    error: SourceError,
}

impl ErrorSource {
    pub fn new(name: impl Into<String>, kind: SourceKind, error: SourceError) -> Self {
        Self {
            name: name.into(),
            kind,
            error,
        }
    }
}

impl EventSource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch_drafts<'a>(
        &'a self,
        _http: &'a HttpFetcher,
    ) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>> {
        let error =
            SourceError::new(self.error.code(), self.error.message()).with_source_name(&self.name);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorCode;
    use crate::http::FetchConfig;

    #[test]
    fn run_order_follows_kind() {
        let mut kinds = vec![
            SourceKind::Fallback,
            SourceKind::Scrape,
            SourceKind::JsonApi,
            SourceKind::Feed,
        ];
        kinds.sort_by_key(SourceKind::run_order);
        assert_eq!(
            kinds,
            vec![
                SourceKind::JsonApi,
                SourceKind::Feed,
                SourceKind::Scrape,
                SourceKind::Fallback
            ]
        );
    }

    #[test]
    fn only_api_and_scrape_are_filtered() {
        assert!(SourceKind::JsonApi.is_filtered());
        assert!(SourceKind::Scrape.is_filtered());
        assert!(!SourceKind::Feed.is_filtered());
        assert!(!SourceKind::Fallback.is_filtered());
    }

    #[tokio::test]
    async fn error_source_returns_error() {
        let http = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let source = ErrorSource::new(
            "not a url",
            SourceKind::Scrape,
            SourceError::invalid_url("relative URL without a base"),
        );

        assert_eq!(source.name(), "not a url");
        assert_eq!(source.kind(), SourceKind::Scrape);

        let err = source.fetch_drafts(&http).await.unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::InvalidUrl);
        assert_eq!(err.source_name(), Some("not a url"));
    }
}
