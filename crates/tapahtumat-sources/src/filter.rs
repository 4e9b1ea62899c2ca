//! Validity filter for drafts from untrusted sources.
//!
//! Scraped pages and loosely specified APIs also surface site chrome (menus,
//! cookie banners, footers). Those are dropped by title length and a fixed
//! denylist.

use tracing::debug;

use crate::draft::EventDraft;

/// Minimum title length, in characters, after trimming.
pub const MIN_TITLE_CHARS: usize = 5;

/// Lowercase tokens that mark a title as site chrome.
pub const DENYLIST: &[&str] = &[
    "navigation",
    "navigaatio",
    "menu",
    "valikko",
    "footer",
    "alatunniste",
    "header",
    "cookie",
    "eväste",
    "search",
    "hae sivustolta",
    "login",
    "kirjaudu",
    "privacy",
    "tietosuoja",
    "skip to",
    "siirry sisältöön",
    "breadcrumb",
    "newsletter",
    "uutiskirje",
];

/// Returns true when the draft looks like a real event.
pub fn is_valid(draft: &EventDraft) -> bool {
    let title = draft.title.trim();
    if title.chars().count() < MIN_TITLE_CHARS {
        debug!(title = %title, "Rejected draft: title too short");
        return false;
    }

    let lowered = title.to_lowercase();
    if let Some(token) = DENYLIST.iter().find(|token| lowered.contains(*token)) {
        debug!(title = %title, token = %token, "Rejected draft: denylisted token");
        return false;
    }

    true
}
