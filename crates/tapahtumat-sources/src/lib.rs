//! EventSource trait, source adapters and the aggregator.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐
//! │ JSON API │  │ RSS/Atom │  │  Scrape  │  │ Built-in │
//! └────┬─────┘  └────┬─────┘  └────┬─────┘  └────┬─────┘
//!      │             │             │             │
//!      │        EventSource (fetch_drafts)       │
//!      └─────────────┴──────┬──────┴─────────────┘
//!                           ▼
//!                    ┌─────────────┐
//!                    │ EventDraft  │──▶ is_valid (API, scrape)
//!                    └──────┬──────┘
//!                           ▼ normalize_draft()
//!                    ┌─────────────┐
//!                    │    Event    │
//!                    └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tapahtumat_sources::{Aggregator, FetchConfig, HttpFetcher};
//!
//! let mut aggregator = Aggregator::new(HttpFetcher::new(&FetchConfig::default())?, normalizer);
//! aggregator.add_json_api("https://kalenteri.jyvaskyla.fi/api/events");
//! let (events, report) = aggregator.run().await;
//! ```

pub mod aggregate;
pub mod draft;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod feed;
pub mod filter;
pub mod http;
pub mod json_api;
pub mod normalize;
pub mod scrape;
pub mod source;

pub use aggregate::{AggregateReport, Aggregator, SourceOutcome};
pub use draft::{DraftDate, EventDraft};
pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use extract::{ElementFields, FieldLookup, extract};
pub use fallback::{FallbackSource, fallback_drafts};
pub use feed::{FeedSource, parse_feed};
pub use filter::is_valid;
pub use http::{FetchConfig, HttpFetcher};
pub use json_api::{JsonApiSource, parse_records};
pub use normalize::{normalize_draft, normalize_drafts};
pub use scrape::{ScrapeSource, parse_page};
pub use source::{BoxFuture, ErrorSource, EventSource, SourceKind};
