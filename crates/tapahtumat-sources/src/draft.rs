//! Source-agnostic event drafts.
//!
//! Adapters produce [`EventDraft`]s: loosely typed, with dates still in
//! whatever shape the source used. [`normalize_draft`](crate::normalize_draft)
//! turns them into canonical events.

use tapahtumat_core::Timestamp;

/// A date as delivered by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftDate {
    /// Free text, parsed by the date normalizer.
    Text(String),
    /// Already a typed timestamp (Atom dates, built-in events).
    At(Timestamp),
}

/// An event as read from one source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Title as found in the source, without any provenance marker.
    pub title: String,
    /// Prefixed to the title when the draft is normalized.
    pub marker: Option<&'static str>,
    pub description: Option<String>,
    pub start: Option<DraftDate>,
    pub end: Option<DraftDate>,
    pub location: Option<String>,
    /// Absolute URL.
    pub url: Option<String>,
    pub source: Option<String>,
}

impl EventDraft {
    /// Creates a draft with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            marker: None,
            description: None,
            start: None,
            end: None,
            location: None,
            url: None,
            source: None,
        }
    }

    pub fn with_marker(mut self, marker: &'static str) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the start from raw source text.
    pub fn with_start_text(mut self, start: Option<String>) -> Self {
        self.start = start.map(DraftDate::Text);
        self
    }

    /// Sets the end from raw source text.
    pub fn with_end_text(mut self, end: Option<String>) -> Self {
        self.end = end.map(DraftDate::Text);
        self
    }

    pub fn with_start_at(mut self, start: Timestamp) -> Self {
        self.start = Some(DraftDate::At(start));
        self
    }

    pub fn with_end_at(mut self, end: Timestamp) -> Self {
        self.end = Some(DraftDate::At(end));
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the title as it will be displayed, marker included.
    pub fn display_title(&self) -> String {
        match self.marker {
            Some(marker) => format!("{} {}", marker, self.title),
            None => self.title.clone(),
        }
    }
}
