//! RSS 2.0 and Atom feed adapter.
//!
//! Feeds are structurally trustworthy, so their entries skip the validity
//! filter and carry no provenance marker.

use tapahtumat_core::DEFAULT_REGION;
use tracing::debug;
use url::Url;

use crate::draft::EventDraft;
use crate::error::{SourceError, SourceResult};
use crate::http::HttpFetcher;
use crate::source::{BoxFuture, EventSource, SourceKind};

pub const SOURCE_LABEL: &str = "RSS Feed";

/// Title for entries that have none.
pub const UNTITLED: &str = "Nimetön tapahtuma";

/// An RSS or Atom feed.
#[derive(Debug, Clone)]
pub struct FeedSource {
    url: Url,
}

impl FeedSource {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

impl EventSource for FeedSource {
    fn name(&self) -> &str {
        self.url.as_str()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Feed
    }

    fn fetch_drafts<'a>(
        &'a self,
        http: &'a HttpFetcher,
    ) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>> {
        Box::pin(async move {
            let body = http.get_bytes(&self.url).await?;
            parse_feed(&body).map_err(|e| e.with_source_name(self.url.as_str()))
        })
    }
}

/// Parses a feed document, trying RSS first and Atom second.
///
/// # Errors
///
/// Fails when the body is neither.
pub fn parse_feed(body: &[u8]) -> SourceResult<Vec<EventDraft>> {
    let rss_error = match rss::Channel::read_from(body) {
        Ok(channel) => return Ok(parse_rss_channel(&channel)),
        Err(e) => e,
    };

    if let Ok(feed) = atom_syndication::Feed::read_from(body) {
        return Ok(parse_atom_feed(&feed));
    }

    Err(SourceError::invalid_response(format!(
        "Not an RSS or Atom feed: {}",
        rss_error
    )))
}

fn parse_rss_channel(channel: &rss::Channel) -> Vec<EventDraft> {
    debug!(items = channel.items().len(), "Parsed RSS channel");
    channel
        .items()
        .iter()
        .map(|item| {
            EventDraft::new(non_empty(item.title()).unwrap_or(UNTITLED))
                .with_description(non_empty(item.description()).map(String::from))
                .with_start_text(non_empty(item.pub_date()).map(String::from))
                .with_location(Some(DEFAULT_REGION.to_string()))
                .with_url(non_empty(item.link()).map(String::from))
                .with_source(SOURCE_LABEL)
        })
        .collect()
}

fn parse_atom_feed(feed: &atom_syndication::Feed) -> Vec<EventDraft> {
    debug!(entries = feed.entries().len(), "Parsed Atom feed");
    feed.entries()
        .iter()
        .map(|entry| {
            let published = entry.published().copied().unwrap_or(*entry.updated());
            let summary = entry.summary().map(|s| s.as_str());

            EventDraft::new(non_empty(Some(entry.title().as_str())).unwrap_or(UNTITLED))
                .with_description(non_empty(summary).map(String::from))
                .with_start_at(published)
                .with_location(Some(DEFAULT_REGION.to_string()))
                .with_url(entry.links().first().map(|l| l.href().to_string()))
                .with_source(SOURCE_LABEL)
        })
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DraftDate;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Jyväskylän tapahtumat</title>
    <link>https://www.jyvaskyla.fi</link>
    <description>Tapahtumat</description>
    <item>
      <title>Runoilta kirjastossa</title>
      <link>https://www.jyvaskyla.fi/kirjasto/runoilta</link>
      <description>Paikalliset runoilijat esiintyvät</description>
      <pubDate>Mon, 02 Jun 2025 18:00:00 GMT</pubDate>
    </item>
    <item>
      <description>Ilman otsikkoa</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Kampuksen tapahtumat</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2025-06-01T08:00:00+03:00</updated>
  <entry>
    <title>Luontoretki</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <link href="https://www.jyu.fi/luontoretki"/>
    <updated>2025-06-01T08:00:00+03:00</updated>
    <published>2025-06-14T14:00:00+03:00</published>
    <summary>Opastettu retki</summary>
  </entry>
  <entry>
    <title>Avoimet ovet</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6b</id>
    <updated>2025-06-20T10:00:00+03:00</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items() {
        let drafts = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(drafts.len(), 2);

        let first = &drafts[0];
        assert_eq!(first.title, "Runoilta kirjastossa");
        assert!(first.marker.is_none());
        assert_eq!(
            first.description.as_deref(),
            Some("Paikalliset runoilijat esiintyvät")
        );
        assert_eq!(
            first.start,
            Some(DraftDate::Text("Mon, 02 Jun 2025 18:00:00 GMT".into()))
        );
        assert_eq!(first.location.as_deref(), Some("Jyväskylä"));
        assert_eq!(
            first.url.as_deref(),
            Some("https://www.jyvaskyla.fi/kirjasto/runoilta")
        );
        assert_eq!(first.source.as_deref(), Some("RSS Feed"));
    }

    #[test]
    fn untitled_rss_item_gets_default_title() {
        let drafts = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(drafts[1].title, "Nimetön tapahtuma");
        assert!(drafts[1].start.is_none());
        assert!(drafts[1].url.is_none());
    }

    #[test]
    fn parses_atom_entries() {
        let drafts = parse_feed(ATOM.as_bytes()).unwrap();
        assert_eq!(drafts.len(), 2);

        let first = &drafts[0];
        assert_eq!(first.title, "Luontoretki");
        assert_eq!(first.description.as_deref(), Some("Opastettu retki"));
        assert_eq!(first.url.as_deref(), Some("https://www.jyu.fi/luontoretki"));
        match &first.start {
            Some(DraftDate::At(ts)) => {
                assert_eq!(ts.to_rfc3339(), "2025-06-14T14:00:00+03:00")
            }
            other => panic!("unexpected start: {:?}", other),
        }
    }

    #[test]
    fn atom_falls_back_to_updated() {
        let drafts = parse_feed(ATOM.as_bytes()).unwrap();
        match &drafts[1].start {
            Some(DraftDate::At(ts)) => {
                assert_eq!(ts.to_rfc3339(), "2025-06-20T10:00:00+03:00")
            }
            other => panic!("unexpected start: {:?}", other),
        }
        assert!(drafts[1].url.is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        let err = parse_feed(b"{\"not\": \"xml\"}").unwrap_err();
        assert_eq!(err.code(), crate::SourceErrorCode::InvalidResponse);
    }
}
