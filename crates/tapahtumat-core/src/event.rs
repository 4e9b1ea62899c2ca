//! The canonical event record.
//!
//! Every source adapter produces [`Event`]s and every renderer consumes them.
//! Events carry no identity across runs; the calendar UID is derived from the
//! title and start time when the feed is serialized.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A point in time with the UTC offset it was parsed or assumed at.
pub type Timestamp = DateTime<FixedOffset>;

/// Region name used when an event has no location of its own.
pub const DEFAULT_REGION: &str = "Jyväskylä";

/// Domain suffix for derived calendar UIDs.
pub const UID_DOMAIN: &str = "jyvaskyla-events.github.io";

/// Length of an event without an explicit end.
pub fn default_duration() -> Duration {
    Duration::hours(2)
}

/// A normalized event from any source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The event title, including the provenance marker of its adapter.
    pub title: String,
    /// Free-text description. Never truncated in storage.
    pub description: Option<String>,
    /// When the event starts.
    pub start: Option<Timestamp>,
    /// When the event ends.
    pub end: Option<Timestamp>,
    /// Where the event takes place.
    pub location: Option<String>,
    /// Absolute link to more information.
    pub url: Option<String>,
    /// Short label of the adapter or channel that produced the event.
    pub source: Option<String>,
}

impl Event {
    /// Creates an event with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start: None,
            end: None,
            location: None,
            url: None,
            source: None,
        }
    }

    /// Returns the end time, defaulting to two hours after the start.
    pub fn effective_end(&self) -> Option<Timestamp> {
        self.end.or_else(|| self.start.map(|s| s + default_duration()))
    }

    /// Returns the location, or the region name when none is set.
    pub fn location_or_default(&self) -> &str {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_REGION)
    }

    /// Returns the URL when it is present and non-empty.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Derives a calendar UID from the title and start time.
    ///
    /// SHA-256 is used so the same logical event maps to the same UID across
    /// runs and process restarts. Distinct events sharing a title and a
    /// placeholder start will collide.
    pub fn calendar_uid(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        if let Some(start) = self.start {
            hasher.update(start.to_rfc3339().as_bytes());
        }
        let digest = hasher.finalize();
        let short: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
        format!("{}@{}", short, UID_DOMAIN)
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the start time.
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Returns the events that have a start time, ordered by it.
///
/// Events without a start are left out; the input is not modified.
pub fn sorted_by_start(events: &[Event]) -> Vec<&Event> {
    let mut dated: Vec<&Event> = events.iter().filter(|e| e.start.is_some()).collect();
    dated.sort_by_key(|e| e.start);
    dated
}
