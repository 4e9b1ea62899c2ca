//! The per-run event aggregator.
//!
//! Sources run one after another in a fixed order (APIs, feeds, scraped
//! pages, built-in events). A failing source contributes nothing and the run
//! continues; the built-in events are always appended last.

use tapahtumat_core::{DateNormalizer, Event, Timestamp};
use tracing::{debug, info, warn};
use url::Url;

use crate::draft::EventDraft;
use crate::error::SourceError;
use crate::fallback::FallbackSource;
use crate::feed::FeedSource;
use crate::filter::is_valid;
use crate::http::HttpFetcher;
use crate::json_api::JsonApiSource;
use crate::normalize::normalize_drafts;
use crate::scrape::ScrapeSource;
use crate::source::{ErrorSource, EventSource, SourceKind};

/// What one source contributed to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub name: String,
    pub kind: SourceKind,
    /// Events added to the collection.
    pub accepted: usize,
    /// Drafts dropped by the validity filter.
    pub rejected: usize,
    /// Error message when the source failed as a whole.
    pub failure: Option<String>,
}

/// Per-source outcomes of a run, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl AggregateReport {
    /// Total number of events collected.
    pub fn total_events(&self) -> usize {
        self.outcomes.iter().map(|o| o.accepted).sum()
    }

    /// Number of sources that failed.
    pub fn failed_sources(&self) -> usize {
        self.outcomes.iter().filter(|o| o.failure.is_some()).count()
    }

    /// True when at least one source failed.
    pub fn is_degraded(&self) -> bool {
        self.failed_sources() > 0
    }
}

/// Drives all configured sources and collects their events.
pub struct Aggregator {
    http: HttpFetcher,
    normalizer: DateNormalizer,
    sources: Vec<Box<dyn EventSource>>,
}

impl Aggregator {
    pub fn new(http: HttpFetcher, normalizer: DateNormalizer) -> Self {
        Self {
            http,
            normalizer,
            sources: Vec::new(),
        }
    }

    /// Adds a source. Run order is decided by its kind, not by call order.
    pub fn add_source(&mut self, source: Box<dyn EventSource>) {
        self.sources.push(source);
    }

    /// Adds a JSON API endpoint.
    pub fn add_json_api(&mut self, endpoint: &str) {
        let source = parse_source_url(endpoint, SourceKind::JsonApi)
            .map(|url| Box::new(JsonApiSource::new(url)) as Box<dyn EventSource>);
        self.add_source(source.unwrap_or_else(|e| e));
    }

    /// Adds an RSS or Atom feed.
    pub fn add_feed(&mut self, url: &str) {
        let source = parse_source_url(url, SourceKind::Feed)
            .map(|url| Box::new(FeedSource::new(url)) as Box<dyn EventSource>);
        self.add_source(source.unwrap_or_else(|e| e));
    }

    /// Adds a page to scrape.
    pub fn add_scrape(&mut self, page: &str) {
        let source = parse_source_url(page, SourceKind::Scrape)
            .map(|url| Box::new(ScrapeSource::new(url)) as Box<dyn EventSource>);
        self.add_source(source.unwrap_or_else(|e| e));
    }

    /// Number of configured sources, not counting the built-in events.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Runs every source against the current clock.
    pub async fn run(&self) -> (Vec<Event>, AggregateReport) {
        self.run_at(self.normalizer.now()).await
    }

    /// Runs every source, dating placeholders and built-in events from `now`.
    pub async fn run_at(&self, now: Timestamp) -> (Vec<Event>, AggregateReport) {
        let fallback = FallbackSource::new(now);

        let mut ordered: Vec<&dyn EventSource> = self.sources.iter().map(|s| s.as_ref()).collect();
        ordered.sort_by_key(|s| s.kind().run_order());
        ordered.push(&fallback);

        let mut events: Vec<Event> = Vec::new();
        let mut report = AggregateReport::default();

        for source in ordered {
            let outcome = match source.fetch_drafts(&self.http).await {
                Ok(drafts) => self.collect(source, drafts, now, &mut events),
                Err(error) => failed(source, &error),
            };
            report.outcomes.push(outcome);
        }

        info!(
            events = events.len(),
            sources = report.outcomes.len(),
            failed = report.failed_sources(),
            "Aggregation finished"
        );
        (events, report)
    }

    fn collect(
        &self,
        source: &dyn EventSource,
        drafts: Vec<EventDraft>,
        now: Timestamp,
        events: &mut Vec<Event>,
    ) -> SourceOutcome {
        let total = drafts.len();
        let kept: Vec<EventDraft> = if source.kind().is_filtered() {
            drafts.into_iter().filter(is_valid).collect()
        } else {
            drafts
        };
        let rejected = total - kept.len();

        let accepted = normalize_drafts(kept, &self.normalizer, now);
        info!(
            source = source.name(),
            kind = %source.kind(),
            accepted = accepted.len(),
            rejected,
            "Source fetched"
        );

        let outcome = SourceOutcome {
            name: source.name().to_string(),
            kind: source.kind(),
            accepted: accepted.len(),
            rejected,
            failure: None,
        };
        events.extend(accepted);
        outcome
    }
}

fn failed(source: &dyn EventSource, error: &SourceError) -> SourceOutcome {
    warn!(
        source = source.name(),
        kind = %source.kind(),
        code = %error.code(),
        error = %error,
        "Source failed, continuing without it"
    );
    SourceOutcome {
        name: source.name().to_string(),
        kind: source.kind(),
        accepted: 0,
        rejected: 0,
        failure: Some(error.to_string()),
    }
}

/// Parses a configured URL; a bad one becomes an [`ErrorSource`].
fn parse_source_url(raw: &str, kind: SourceKind) -> Result<Url, Box<dyn EventSource>> {
    Url::parse(raw.trim()).map_err(|e| {
        debug!(url = raw, kind = %kind, error = %e, "Invalid source URL");
        Box::new(ErrorSource::new(
            raw,
            kind,
            SourceError::invalid_url(format!("Invalid URL: {}", e)),
        )) as Box<dyn EventSource>
    })
}
