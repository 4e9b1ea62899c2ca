//! iCalendar feed rendering.

use chrono::Utc;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

use crate::event::{Event, Timestamp};
use crate::format::display_time;

pub const PRODUCT_ID: &str = "-//Jyväskylän Tapahtumakalenteri//GitHub//";
pub const CALENDAR_NAME: &str = "Jyväskylän Tapahtumat";
pub const CALENDAR_DESCRIPTION: &str =
    "Ajankohtaiset tapahtumat Jyväskylän alueelta - Päivittyy automaattisesti";
pub const CALENDAR_TIMEZONE: &str = "Europe/Helsinki";

/// Source label used in descriptions when an event has none.
const UNKNOWN_SOURCE: &str = "Tuntematon";

/// Calendar-level properties that are always emitted by [`normalize_header`].
const HEADER_PROPERTIES: [&str; 4] = ["VERSION", "PRODID", "CALSCALE", "METHOD"];

/// Renders the events as an iCalendar 2.0 feed.
///
/// Events keep collection order. Events without a start are emitted without
/// DTSTART/DTEND.
pub fn render_calendar(events: &[Event], generated_at: Timestamp) -> String {
    let mut calendar = Calendar::new();
    calendar
        .name(CALENDAR_NAME)
        .description(CALENDAR_DESCRIPTION)
        .timezone(CALENDAR_TIMEZONE);

    for event in events {
        calendar.push(to_vevent(event, generated_at));
    }

    normalize_header(&calendar.to_string())
}

fn to_vevent(event: &Event, generated_at: Timestamp) -> IcalEvent {
    let mut vevent = IcalEvent::new();
    vevent
        .summary(&event.title)
        .description(&event_description(event, generated_at))
        .location(event.location_or_default())
        .uid(&event.calendar_uid())
        .timestamp(generated_at.with_timezone(&Utc));

    if let Some(start) = event.start {
        vevent.starts(start.with_timezone(&Utc));
    }
    if let Some(end) = event.effective_end() {
        vevent.ends(end.with_timezone(&Utc));
    }
    if let Some(url) = event.link() {
        vevent.add_property("URL", url);
    }

    vevent.done()
}

/// Builds the DESCRIPTION text: free text, location, source, optional link,
/// then the update footer.
pub fn event_description(event: &Event, generated_at: Timestamp) -> String {
    let mut text = format!(
        "{}\n\n📍 {}\n🔗 Lähde: {}",
        event.description.as_deref().unwrap_or_default(),
        event.location_or_default(),
        event
            .source
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SOURCE),
    );
    if let Some(url) = event.link() {
        text.push_str("\n🌐 Lisätietoja: ");
        text.push_str(url);
    }
    text.push_str("\n\n📅 Kalenteri päivitetty: ");
    text.push_str(&display_time(&generated_at));
    text
}

/// Rewrites the calendar header so VERSION, PRODID, CALSCALE and METHOD carry
/// our values regardless of what the serializer emitted.
fn normalize_header(ics: &str) -> String {
    let mut out = String::with_capacity(ics.len() + 128);
    let mut in_header = false;

    for line in ics.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        if line == "BEGIN:VCALENDAR" {
            in_header = true;
            out.push_str(line);
            out.push_str("\r\n");
            for header in [
                "VERSION:2.0".to_string(),
                format!("PRODID:{}", PRODUCT_ID),
                "CALSCALE:GREGORIAN".to_string(),
                "METHOD:PUBLISH".to_string(),
            ] {
                out.push_str(&header);
                out.push_str("\r\n");
            }
            continue;
        }
        if line.starts_with("BEGIN:") {
            in_header = false;
        }
        if in_header && is_header_property(line) {
            continue;
        }
        out.push_str(line);
        out.push_str("\r\n");
    }

    out
}

fn is_header_property(line: &str) -> bool {
    HEADER_PROPERTIES.iter().any(|name| {
        line.strip_prefix(name)
            .is_some_and(|rest| rest.starts_with(':') || rest.starts_with(';'))
    })
}
