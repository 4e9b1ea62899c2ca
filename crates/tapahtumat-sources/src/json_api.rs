//! JSON API adapter.
//!
//! Municipal event APIs differ in shape and vocabulary. The body may be a bare
//! list of records or an object wrapping the list; record fields are found
//! through alias lists covering English and Finnish names.

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::draft::EventDraft;
use crate::error::{SourceError, SourceResult};
use crate::extract::extract;
use crate::http::HttpFetcher;
use crate::source::{BoxFuture, EventSource, SourceKind};

pub const MARKER: &str = "🏛️";
pub const SOURCE_LABEL: &str = "Jyväskylän kaupunki";

/// Keys that may wrap the record list, in priority order.
const LIST_KEYS: &[&str] = &["events", "data", "items", "results"];

const TITLE: &[&str] = &["title", "name", "nimi", "otsikko", "summary"];
const DESCRIPTION: &[&str] = &["description", "kuvaus", "summary", "content"];
const START: &[&str] = &[
    "start_date",
    "startDate",
    "start_time",
    "start",
    "alkaa",
    "date",
    "pvm",
];
const END: &[&str] = &["end_date", "endDate", "end_time", "end", "loppuu"];
const LOCATION: &[&str] = &["location", "venue", "paikka", "address", "osoite"];
const URL: &[&str] = &["url", "link", "href", "www"];

/// An event API endpoint.
#[derive(Debug, Clone)]
pub struct JsonApiSource {
    endpoint: Url,
}

impl JsonApiSource {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl EventSource for JsonApiSource {
    fn name(&self) -> &str {
        self.endpoint.as_str()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::JsonApi
    }

    fn fetch_drafts<'a>(
        &'a self,
        http: &'a HttpFetcher,
    ) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>> {
        Box::pin(async move {
            let body = http.get_text(&self.endpoint).await?;
            parse_records(&body, &self.endpoint)
                .map_err(|e| e.with_source_name(self.endpoint.as_str()))
        })
    }
}

/// Parses an API response body into drafts.
///
/// # Errors
///
/// Fails when the body is not JSON or holds no recognizable record list.
/// Records that are not objects or have no title are skipped.
pub fn parse_records(body: &str, endpoint: &Url) -> SourceResult<Vec<EventDraft>> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("Response is not JSON: {}", e)).with_cause(e)
    })?;

    let records = record_list(&value)
        .ok_or_else(|| SourceError::invalid_response("No event list found in response"))?;

    let drafts: Vec<EventDraft> = records
        .iter()
        .filter_map(|record| match record.as_object() {
            Some(object) => parse_record(object, endpoint),
            None => {
                debug!("Skipping non-object record");
                None
            }
        })
        .collect();

    Ok(drafts)
}

fn record_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(object) => LIST_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

fn parse_record(record: &Map<String, Value>, endpoint: &Url) -> Option<EventDraft> {
    let Some(title) = extract(record, TITLE) else {
        debug!("Skipping record without a title");
        return None;
    };

    let url = extract(record, URL).and_then(|raw| resolve_url(&raw, endpoint));

    Some(
        EventDraft::new(title)
            .with_marker(MARKER)
            .with_description(extract(record, DESCRIPTION))
            .with_start_text(extract(record, START))
            .with_end_text(extract(record, END))
            .with_location(extract(record, LOCATION))
            .with_url(url)
            .with_source(SOURCE_LABEL),
    )
}

/// Keeps absolute URLs and resolves root-relative paths against the
/// endpoint's origin. Anything else is kept verbatim.
fn resolve_url(raw: &str, endpoint: &Url) -> Option<String> {
    if Url::parse(raw).is_ok() {
        return Some(raw.to_string());
    }
    if raw.starts_with('/') {
        return endpoint.join(raw).map(String::from).ok();
    }
    Some(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("https://kalenteri.jyvaskyla.fi/api/events").unwrap()
    }

    #[test]
    fn bare_list() {
        let body = r#"[{"title": "Kevätkonsertti", "start_date": "2025-06-03 19:00:00"}]"#;
        let drafts = parse_records(body, &endpoint()).unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Kevätkonsertti");
        assert_eq!(drafts[0].display_title(), "🏛️ Kevätkonsertti");
        assert_eq!(drafts[0].source.as_deref(), Some("Jyväskylän kaupunki"));
    }

    #[test]
    fn wrapped_under_events() {
        let body = r#"{"events": [{"nimi": "Taidenäyttely", "paikka": "Taidemuseo"}]}"#;
        let drafts = parse_records(body, &endpoint()).unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Taidenäyttely");
        assert_eq!(drafts[0].location.as_deref(), Some("Taidemuseo"));
    }

    #[test]
    fn wrapped_under_data() {
        let body = r#"{"meta": {"total": 2}, "data": [{"name": "A-tapahtuma"}, {"otsikko": "B-tapahtuma"}]}"#;
        let drafts = parse_records(body, &endpoint()).unwrap();
        let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A-tapahtuma", "B-tapahtuma"]);
    }

    #[test]
    fn finnish_field_names() {
        let body = r#"[{
            "otsikko": "Kirjailijavierailu",
            "kuvaus": "Keskustelua ja kahvia",
            "alkaa": "2025-06-09T18:00:00",
            "loppuu": "2025-06-09T19:30:00",
            "osoite": "Vapaudenkatu 39",
            "www": "https://www.jyvaskyla.fi/kirjasto"
        }]"#;
        let drafts = parse_records(body, &endpoint()).unwrap();
        let draft = &drafts[0];

        assert_eq!(draft.description.as_deref(), Some("Keskustelua ja kahvia"));
        assert_eq!(
            draft.start,
            Some(crate::DraftDate::Text("2025-06-09T18:00:00".into()))
        );
        assert_eq!(
            draft.end,
            Some(crate::DraftDate::Text("2025-06-09T19:30:00".into()))
        );
        assert_eq!(draft.location.as_deref(), Some("Vapaudenkatu 39"));
        assert_eq!(
            draft.url.as_deref(),
            Some("https://www.jyvaskyla.fi/kirjasto")
        );
    }

    #[test]
    fn records_without_title_are_skipped() {
        let body = r#"[{"description": "no title"}, 42, "text", {"title": "Jazz-ilta"}]"#;
        let drafts = parse_records(body, &endpoint()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Jazz-ilta");
    }

    #[test]
    fn relative_url_resolved_against_origin() {
        let body = r#"[{"title": "Jazz-ilta", "url": "/tapahtumat/jazz"}]"#;
        let drafts = parse_records(body, &endpoint()).unwrap();
        assert_eq!(
            drafts[0].url.as_deref(),
            Some("https://kalenteri.jyvaskyla.fi/tapahtumat/jazz")
        );
    }

    #[test]
    fn schemeless_url_is_kept_verbatim() {
        let body = r#"[{"title": "Jazz-ilta", "url": "www.jyvaskyla.fi/x"}]"#;
        let drafts = parse_records(body, &endpoint()).unwrap();
        assert_eq!(drafts[0].url.as_deref(), Some("www.jyvaskyla.fi/x"));
    }

    #[test]
    fn absolute_url_is_untouched() {
        let body = r#"[{"title": "Jazz-ilta", "link": "https://lutakko.fi/ohjelma?id=3"}]"#;
        let drafts = parse_records(body, &endpoint()).unwrap();
        assert_eq!(drafts[0].url.as_deref(), Some("https://lutakko.fi/ohjelma?id=3"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_records("<html>not json</html>", &endpoint()).unwrap_err();
        assert_eq!(err.code(), crate::SourceErrorCode::InvalidResponse);
    }

    #[test]
    fn unrecognized_shape_is_an_error() {
        let err = parse_records(r#"{"tapahtumat": []}"#, &endpoint()).unwrap_err();
        assert_eq!(err.code(), crate::SourceErrorCode::InvalidResponse);
        assert!(parse_records("42", &endpoint()).is_err());
    }

    #[test]
    fn empty_list_is_fine() {
        assert!(parse_records("[]", &endpoint()).unwrap().is_empty());
        assert!(parse_records(r#"{"items": []}"#, &endpoint()).unwrap().is_empty());
    }
}
