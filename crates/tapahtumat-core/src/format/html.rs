//! Subscription page rendering.
//!
//! The page is a fixed template with a handful of `{{placeholder}}` slots.
//! Everything injected is escaped; the template itself is trusted.

use crate::event::{Event, Timestamp, sorted_by_start};
use crate::format::{display_time, ellipsis, html_escape};

const TEMPLATE: &str = include_str!("../../templates/index.html");

/// Number of events shown on the page when not configured otherwise.
pub const DEFAULT_HTML_LIMIT: usize = 15;

/// Repository used when `GITHUB_REPOSITORY` is not set.
pub const FALLBACK_REPOSITORY: &str = "käyttäjä/jyvaskyla-tapahtumat";

const DESCRIPTION_PREVIEW_CHARS: usize = 300;
const UNKNOWN_LOCATION: &str = "Paikka ei tiedossa";
const UNKNOWN_SOURCE: &str = "Tuntematon lähde";

/// Where the page and its calendar feed are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// `owner/repo` slug of the hosting repository.
    pub repository: String,
    /// Public URL of `calendar.ics`.
    pub calendar_url: String,
}

impl PageContext {
    /// Builds the context from an `owner/repo` slug, falling back to a
    /// placeholder when absent or blank.
    pub fn from_repository(repository: Option<&str>) -> Self {
        let repository = repository
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(FALLBACK_REPOSITORY);

        let (owner, name) = match repository.split_once('/') {
            Some((owner, name)) if !name.is_empty() => (owner, name),
            _ => (repository.trim_end_matches('/'), "jyvaskyla-tapahtumat"),
        };

        Self {
            repository: repository.to_string(),
            calendar_url: format!("https://{}.github.io/{}/calendar.ics", owner, name),
        }
    }
}

/// Renders `index.html`.
///
/// Only events with a start are listed, soonest first, at most `limit` of
/// them; a notice counts the rest.
pub fn render_page(
    events: &[Event],
    context: &PageContext,
    limit: usize,
    generated_at: Timestamp,
) -> String {
    let sorted = sorted_by_start(events);

    fill_template(TEMPLATE, |name| match name {
        "calendar_url" => Some(html_escape(&context.calendar_url)),
        "repository" => Some(html_escape(&context.repository)),
        "event_count" => Some(sorted.len().to_string()),
        "updated" => Some(display_time(&generated_at)),
        "events" => Some(render_event_list(&sorted, limit)),
        _ => None,
    })
}

/// Replaces `{{name}}` slots in one pass; injected values are never rescanned.
/// Unknown names are left as they are.
fn fill_template(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };

        out.push_str(&rest[..open]);
        let name = &after_open[..close];
        match value(name) {
            Some(text) => out.push_str(&text),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

/// Renders the event cards and the overflow notice.
pub(crate) fn render_event_list(sorted: &[&Event], limit: usize) -> String {
    let mut out = String::new();
    for event in sorted.iter().take(limit) {
        out.push_str(&render_event_card(event));
    }

    if sorted.len() > limit {
        out.push_str(&format!(
            "<p><em>... ja {} muuta tapahtumaa kalenterissa</em></p>\n",
            sorted.len() - limit
        ));
    }
    out
}

fn render_event_card(event: &Event) -> String {
    let when = event
        .start
        .map(|s| display_time(&s))
        .unwrap_or_else(|| "Aika ei tiedossa".to_string());
    let location = non_empty(event.location.as_deref()).unwrap_or(UNKNOWN_LOCATION);
    let source = non_empty(event.source.as_deref()).unwrap_or(UNKNOWN_SOURCE);

    let mut card = format!(
        "<div class=\"event\">\n\
         <div class=\"event-title\">{}</div>\n\
         <div class=\"event-meta\">\n\
         <span>📅 {}</span>\n\
         <span>📍 {}</span>\n\
         <span class=\"badge\">{}</span>\n\
         </div>\n",
        html_escape(&event.title),
        when,
        html_escape(location),
        html_escape(source),
    );

    if let Some(description) = non_empty(event.description.as_deref()) {
        card.push_str(&format!(
            "<div class=\"event-description\">{}</div>\n",
            html_escape(&ellipsis(description, DESCRIPTION_PREVIEW_CHARS))
        ));
    }
    card.push_str("</div>\n");
    card
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
