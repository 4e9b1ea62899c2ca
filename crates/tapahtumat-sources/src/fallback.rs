//! Built-in events appended to every run.
//!
//! They keep the calendar non-empty when every live source is down. Dates are
//! relative to the run's clock.

use chrono::Duration;
use tapahtumat_core::Timestamp;

use crate::draft::EventDraft;
use crate::error::SourceResult;
use crate::http::HttpFetcher;
use crate::source::{BoxFuture, EventSource, SourceKind};

struct Sample {
    title: &'static str,
    description: &'static str,
    /// Start offset from now, in minutes.
    start: i64,
    /// End offset from now, in minutes.
    end: i64,
    location: &'static str,
    url: &'static str,
    source: &'static str,
}

const fn minutes(days: i64, hours: i64, minutes: i64) -> i64 {
    (days * 24 + hours) * 60 + minutes
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "🎭 Jyväskylän Kesäteatteri",
        description: "Kesäteatterin upea esitys Jyväsjärven rannalla. Kansainvälisesti arvostettu teatteri tarjoaa elämyksiä koko perheelle.",
        start: minutes(3, 19, 0),
        end: minutes(3, 21, 30),
        location: "Jyväskylän Kesäteatteri, Jyväsjärvi",
        url: "https://www.jyvaskyla.fi/kesateatteri",
        source: "Jyväskylän Kesäteatteri",
    },
    Sample {
        title: "🏛️ Alvar Aalto -museo: Arkkitehtuurinäyttely",
        description: "Alvar Aallon suunnittelun salat -näyttely. Tutustu maailmankuulun arkkitehdin töihin.",
        start: minutes(7, 10, 0),
        end: minutes(7, 18, 0),
        location: "Alvar Aalto -museo, Keskusta",
        url: "https://www.alvaraalto.fi",
        source: "Alvar Aalto -museo",
    },
    Sample {
        title: "🎵 Jyväskylän Sinfonia: Kevätkonsertti",
        description: "Klassinen konsertti Jyväskylän kulttuuritalossa. Ohjelmassa Sibelius ja Grieg.",
        start: minutes(12, 19, 0),
        end: minutes(12, 21, 0),
        location: "Jyväskylän kulttuuritalo",
        url: "https://www.jso.fi",
        source: "Jyväskylän Sinfonia",
    },
    Sample {
        title: "🏊‍♀️ Lutakko: Uintikoulu alkaa",
        description: "Aikuisten uintikoulu alkaa Lutakon liikuntakeskuksessa. Ilmoittautuminen käynnissä.",
        start: minutes(5, 18, 0),
        end: minutes(5, 19, 0),
        location: "Lutakon Liikuntakeskus",
        url: "https://www.jyvaskyla.fi/liikunta",
        source: "Jyväskylän liikunta",
    },
    Sample {
        title: "📚 Jyväskylän pääkirjasto: Kirjailijan tapaaminen",
        description: "Paikallinen kirjailija kertoo uusimmasta teoksestaan. Keskustelua ja kahvia.",
        start: minutes(9, 18, 0),
        end: minutes(9, 19, 30),
        location: "Jyväskylän pääkirjasto",
        url: "https://www.jyvaskyla.fi/kirjasto",
        source: "Jyväskylän kirjasto",
    },
    Sample {
        title: "🌿 Jyväskylän Yliopisto: Luontoretki",
        description: "Opastettu luontoretki Jyväskylän ympäristössä. Tutustutaan paikalliseen luontoon.",
        start: minutes(14, 14, 0),
        end: minutes(14, 17, 0),
        location: "Tapaaminen yliopistolla",
        url: "https://www.jyu.fi",
        source: "Jyväskylän yliopisto",
    },
];

/// Returns the built-in drafts dated relative to `now`.
pub fn fallback_drafts(now: Timestamp) -> Vec<EventDraft> {
    SAMPLES
        .iter()
        .map(|s| {
            EventDraft::new(s.title)
                .with_description(Some(s.description.to_string()))
                .with_start_at(now + Duration::minutes(s.start))
                .with_end_at(now + Duration::minutes(s.end))
                .with_location(Some(s.location.to_string()))
                .with_url(Some(s.url.to_string()))
                .with_source(s.source)
        })
        .collect()
}

/// The built-in events as a source.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    now: Timestamp,
}

impl FallbackSource {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }
}

impl EventSource for FallbackSource {
    fn name(&self) -> &str {
        "built-in"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Fallback
    }

    fn fetch_drafts<'a>(
        &'a self,
        _http: &'a HttpFetcher,
    ) -> BoxFuture<'a, SourceResult<Vec<EventDraft>>> {
        let drafts = fallback_drafts(self.now);
        Box::pin(async move { Ok(drafts) })
    }
}
