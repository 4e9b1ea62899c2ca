//! HTML page scraping adapter.
//!
//! Best effort over unknown markup: the first container selector that
//! matches anything on the page is used for the whole page, then each
//! container is mined with the alias-priority extractor.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::draft::EventDraft;
use crate::error::SourceResult;
use crate::extract::{ElementFields, extract};
use crate::http::HttpFetcher;
use crate::source::{BoxFuture, EventSource, SourceKind};

pub const MARKER: &str = "🎪";

/// Source label when the page URL has no host.
pub const FALLBACK_LABEL: &str = "Web";

/// Containers tried in order; the first with any match wins.
const CONTAINERS: &[&str] = &[
    ".event-item",
    ".event",
    ".tapahtuma",
    "article.event",
    ".events-list li",
    "[class*='event']",
];

const TITLE: &[&str] = &["h1", "h2", "h3", "h4", ".title", ".event-title", ".otsikko", "a"];
const DATE: &[&str] = &["time", ".date", ".event-date", ".pvm", ".aika", "[datetime]"];
const DESCRIPTION: &[&str] = &["p", ".description", ".kuvaus", ".excerpt"];
const LOCATION: &[&str] = &[".location", ".venue", ".paikka", ".place"];

/// Titles shorter than this are not events.
const MIN_TITLE_CHARS: usize = 3;

/// A scraped events page.
#[derive(Debug, Clone)]
pub struct ScrapeSource {
    page: Url,
}

impl ScrapeSource {
    pub fn new(page: Url) -> Self {
        Self { page }
    }
}

impl EventSource for ScrapeSource {
    fn name(&self) -> &str {
        self.page.as_str()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Scrape
    }

    fn fetch_drafts<'a>(
        &'a self,
        http: &'a HttpFetcher,
    ) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>> {
        Box::pin(async move {
            let body = http.get_text(&self.page).await?;
            Ok(parse_page(&body, &self.page))
        })
    }
}

/// Extracts drafts from a page, resolving links against `page`.
pub fn parse_page(html: &str, page: &Url) -> Vec<EventDraft> {
    let document = Html::parse_document(html);
    let label = page.host_str().unwrap_or(FALLBACK_LABEL).to_string();

    let Some((selector, containers)) = first_matching_containers(&document) else {
        debug!(page = %page, "No event containers found");
        return Vec::new();
    };
    debug!(page = %page, selector, count = containers.len(), "Using container selector");

    containers
        .into_iter()
        .filter_map(|element| parse_container(element, page, &label))
        .collect()
}

fn first_matching_containers(document: &Html) -> Option<(&'static str, Vec<ElementRef<'_>>)> {
    CONTAINERS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        let found: Vec<ElementRef<'_>> = document.select(&selector).collect();
        (!found.is_empty()).then_some((*css, found))
    })
}

fn parse_container(element: ElementRef<'_>, page: &Url, label: &str) -> Option<EventDraft> {
    let fields = ElementFields::new(element);

    let title = extract(&fields, TITLE)?;
    if title.chars().count() < MIN_TITLE_CHARS {
        debug!(title = %title, "Skipping container: title too short");
        return None;
    }

    let start = extract(&fields.preferring("datetime"), DATE);

    Some(
        EventDraft::new(title)
            .with_marker(MARKER)
            .with_description(extract(&fields, DESCRIPTION))
            .with_start_text(start)
            .with_location(extract(&fields, LOCATION))
            .with_url(container_link(element, page))
            .with_source(label),
    )
}

/// The container's own `href` when it is an anchor, else its first link.
fn container_link(element: ElementRef<'_>, page: &Url) -> Option<String> {
    let own = (element.value().name() == "a")
        .then(|| element.value().attr("href"))
        .flatten();

    let href = match own {
        Some(href) => href,
        None => {
            let selector = Selector::parse("a[href]").ok()?;
            element.select(&selector).next()?.value().attr("href")?
        }
    };

    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    page.join(href).map(String::from).ok()
}
