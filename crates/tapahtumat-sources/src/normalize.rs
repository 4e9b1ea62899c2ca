//! EventDraft to Event conversion.
//!
//! - the provenance marker is prefixed to the title
//! - the start is normalized, falling back to "now + 1 day"
//! - an unparseable end is dropped so renderers apply the default duration

use tapahtumat_core::{DateNormalizer, Event, Timestamp};

use crate::draft::{DraftDate, EventDraft};

/// Converts a draft into a canonical event.
///
/// `now` anchors the placeholder start for drafts whose date is missing or
/// unreadable.
pub fn normalize_draft(draft: EventDraft, normalizer: &DateNormalizer, now: Timestamp) -> Event {
    let title = draft.display_title();

    let start = match draft.start {
        Some(DraftDate::At(ts)) => ts,
        Some(DraftDate::Text(ref raw)) => normalizer.normalize_at(Some(raw), now),
        None => normalizer.normalize_at(None, now),
    };

    let end = match draft.end {
        Some(DraftDate::At(ts)) => Some(ts),
        Some(DraftDate::Text(ref raw)) => normalizer.parse(raw),
        None => None,
    }
    // An end before the start is noise from the source.
    .filter(|end| *end >= start);

    Event {
        title,
        description: draft.description,
        start: Some(start),
        end,
        location: draft.location,
        url: draft.url,
        source: draft.source,
    }
}

/// Converts a batch of drafts, keeping their order.
pub fn normalize_drafts(
    drafts: Vec<EventDraft>,
    normalizer: &DateNormalizer,
    now: Timestamp,
) -> Vec<Event> {
    drafts
        .into_iter()
        .map(|draft| normalize_draft(draft, normalizer, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> Timestamp {
        DateNormalizer::default()
            .offset()
            .with_ymd_and_hms(2025, 5, 20, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn undated_draft_gets_placeholder_start() {
        let draft = EventDraft::new("Kesäkonsertti").with_marker("🎪");
        let event = normalize_draft(draft, &DateNormalizer::default(), now());

        assert_eq!(event.title, "🎪 Kesäkonsertti");
        assert_eq!(event.start, Some(now() + Duration::days(1)));
        assert!(event.end.is_none());
    }

    #[test]
    fn text_dates_are_parsed() {
        let draft = EventDraft::new("Kevätkonsertti")
            .with_start_text(Some("2025-06-03 19:00:00".into()))
            .with_end_text(Some("2025-06-03T21:00:00".into()));
        let event = normalize_draft(draft, &DateNormalizer::default(), now());

        let offset = DateNormalizer::default().offset();
        assert_eq!(
            event.start,
            Some(offset.with_ymd_and_hms(2025, 6, 3, 19, 0, 0).unwrap())
        );
        assert_eq!(
            event.end,
            Some(offset.with_ymd_and_hms(2025, 6, 3, 21, 0, 0).unwrap())
        );
    }

    #[test]
    fn unreadable_end_is_dropped() {
        let draft = EventDraft::new("Kevätkonsertti")
            .with_start_text(Some("2025-06-03".into()))
            .with_end_text(Some("myöhään".into()));
        let event = normalize_draft(draft, &DateNormalizer::default(), now());
        assert!(event.end.is_none());
    }

    #[test]
    fn end_before_start_is_dropped() {
        let draft = EventDraft::new("Kevätkonsertti")
            .with_start_text(Some("2025-06-03".into()))
            .with_end_text(Some("2025-06-02".into()));
        let event = normalize_draft(draft, &DateNormalizer::default(), now());
        assert!(event.end.is_none());
    }

    #[test]
    fn typed_dates_pass_through() {
        let start = now() + Duration::days(3);
        let draft = EventDraft::new("Kesäteatteri")
            .with_start_at(start)
            .with_end_at(start + Duration::hours(2))
            .with_location(Some("Jyväsjärvi".into()))
            .with_source("Jyväskylän Kesäteatteri");
        let event = normalize_draft(draft, &DateNormalizer::default(), now());

        assert_eq!(event.start, Some(start));
        assert_eq!(event.end, Some(start + Duration::hours(2)));
        assert_eq!(event.location.as_deref(), Some("Jyväsjärvi"));
        assert_eq!(event.source.as_deref(), Some("Jyväskylän Kesäteatteri"));
    }

    #[test]
    fn batch_keeps_order() {
        let drafts = vec![EventDraft::new("b"), EventDraft::new("a")];
        let events = normalize_drafts(drafts, &DateNormalizer::default(), now());
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }
}
