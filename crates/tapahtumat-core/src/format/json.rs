//! JSON snapshot rendering.

use serde::{Deserialize, Serialize};

use crate::event::{Event, Timestamp};
use crate::format::RenderError;

/// Top-level shape of `events.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSnapshot {
    /// RFC 3339 update time.
    pub updated: String,
    pub count: usize,
    pub events: Vec<JsonEvent>,
}

/// One event in the snapshot. Text fields are never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEvent {
    pub title: String,
    pub description: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: String,
    pub url: String,
    pub source: String,
}

impl From<&Event> for JsonEvent {
    fn from(event: &Event) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: event.title.clone(),
            description: text(&event.description),
            start_date: event.start.map(|s| s.to_rfc3339()),
            end_date: event.end.map(|e| e.to_rfc3339()),
            location: text(&event.location),
            url: text(&event.url),
            source: text(&event.source),
        }
    }
}

impl JsonSnapshot {
    /// Captures every event in collection order.
    pub fn new(events: &[Event], generated_at: Timestamp) -> Self {
        Self {
            updated: generated_at.to_rfc3339(),
            count: events.len(),
            events: events.iter().map(JsonEvent::from).collect(),
        }
    }
}

/// Renders `events.json` as pretty-printed UTF-8.
pub fn render_snapshot(events: &[Event], generated_at: Timestamp) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(&JsonSnapshot::new(
        events,
        generated_at,
    ))?)
}
