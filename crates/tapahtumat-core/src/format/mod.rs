//! Output rendering for the aggregated event list.
//!
//! Three artifacts are produced from the same read-only slice of events:
//! - **Calendar**: an iCalendar 2.0 feed ([`ical`])
//! - **Page**: the static subscription page ([`html`])
//! - **Snapshot**: a JSON dump for API consumers ([`json`])
//!
//! Renderers never reorder or mutate their input; the page sorts a borrowed
//! view and the other two keep collection order.

pub mod html;
pub mod ical;
pub mod json;


use std::borrow::Cow;

use thiserror::Error;

use crate::event::{Event, Timestamp};

pub use html::{PageContext, render_page};
pub use ical::render_calendar;
pub use json::{JsonEvent, JsonSnapshot, render_snapshot};

/// Display format for dates shown to people (`14.06.2025 19:00`).
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Errors produced while rendering artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The JSON snapshot could not be serialized.
    #[error("failed to serialize event snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// One of the files written per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Calendar,
    Page,
    Snapshot,
}

impl Artifact {
    /// All artifacts, in the order they are written.
    pub const ALL: [Artifact; 3] = [Artifact::Calendar, Artifact::Page, Artifact::Snapshot];

    /// File name inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar.ics",
            Self::Page => "index.html",
            Self::Snapshot => "events.json",
        }
    }
}

/// Renders every artifact for one run.
///
/// `generated_at` stamps the calendar footers, the page and the snapshot so
/// all three agree on the update time.
pub fn render_all(
    events: &[Event],
    page: &PageContext,
    html_limit: usize,
    generated_at: Timestamp,
) -> Result<Vec<(Artifact, String)>, RenderError> {
    Ok(vec![
        (Artifact::Calendar, render_calendar(events, generated_at)),
        (
            Artifact::Page,
            render_page(events, page, html_limit, generated_at),
        ),
        (Artifact::Snapshot, render_snapshot(events, generated_at)?),
    ])
}

/// Formats a timestamp for display.
pub fn display_time(ts: &Timestamp) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Keeps the first `max_len` characters and appends `...` when anything was cut.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len).collect();
    Cow::Owned(format!("{}...", truncated))
}

/// Escapes text for HTML display.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
