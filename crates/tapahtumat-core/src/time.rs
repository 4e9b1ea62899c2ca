//! Date normalization for loosely-typed source values.
//!
//! Sources hand us dates as free text in a handful of shapes (SQL-style,
//! ISO 8601 with and without `Z`, RFC 822 from feeds, bare dates).
//! [`DateNormalizer`] tries a fixed, ordered list of patterns and returns the
//! first match. Anything it cannot parse becomes "now + 1 day": the output is
//! a near-future listing, so an imprecise date beats dropping the event.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use tracing::debug;

use crate::event::Timestamp;

/// Default fixed offset for values that carry no zone (Finnish standard time).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 2;

/// One candidate date shape, tried in declaration order.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// Wall-clock datetime without a zone; interpreted at the fallback offset.
    Naive(&'static str),
    /// Datetime with a literal trailing `Z`.
    Utc(&'static str),
    /// Datetime with a numeric offset (`%z`), after any leading weekday name.
    Offset(&'static str),
    /// Date only; midnight at the fallback offset.
    Date(&'static str),
    /// RFC 3339 with an explicit offset, as found in `datetime` attributes.
    Rfc3339,
}

const PATTERNS: &[Pattern] = &[
    Pattern::Naive("%Y-%m-%d %H:%M:%S"),
    Pattern::Naive("%Y-%m-%dT%H:%M:%S"),
    Pattern::Utc("%Y-%m-%dT%H:%M:%SZ"),
    Pattern::Offset("%d %b %Y %H:%M:%S %z"),
    Pattern::Date("%Y-%m-%d"),
    Pattern::Rfc3339,
];

/// Parses source date values into [`Timestamp`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    offset: FixedOffset,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::with_offset_hours(DEFAULT_UTC_OFFSET_HOURS)
    }
}

impl DateNormalizer {
    /// Creates a normalizer that reads zoneless values at `offset`.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Creates a normalizer from a whole-hour UTC offset.
    ///
    /// Out-of-range offsets fall back to UTC.
    pub fn with_offset_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// Returns the offset used for zoneless values.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the current time at the normalizer's offset.
    pub fn now(&self) -> Timestamp {
        Utc::now().with_timezone(&self.offset)
    }

    /// Returns the placeholder used for absent or unparseable dates.
    pub fn fallback(&self, now: Timestamp) -> Timestamp {
        now + Duration::days(1)
    }

    /// Normalizes a raw value against the current clock.
    pub fn normalize(&self, raw: Option<&str>) -> Timestamp {
        self.normalize_at(raw, self.now())
    }

    /// Normalizes a raw value, using `now` for the fallback.
    pub fn normalize_at(&self, raw: Option<&str>, now: Timestamp) -> Timestamp {
        match raw.and_then(|value| self.parse(value)) {
            Some(ts) => ts,
            None => {
                debug!(raw = ?raw, "Unparseable or missing date, using placeholder");
                self.fallback(now)
            }
        }
    }

    /// Parses a value with the candidate patterns; `None` when all fail.
    pub fn parse(&self, raw: &str) -> Option<Timestamp> {
        let candidate = raw.trim().replace("GMT", "+0000");
        if candidate.is_empty() {
            return None;
        }

        PATTERNS
            .iter()
            .find_map(|pattern| self.try_pattern(*pattern, &candidate))
    }

    fn try_pattern(&self, pattern: Pattern, value: &str) -> Option<Timestamp> {
        match pattern {
            Pattern::Naive(fmt) => {
                let naive = NaiveDateTime::parse_from_str(value, fmt).ok()?;
                self.offset.from_local_datetime(&naive).single()
            }
            Pattern::Utc(fmt) => {
                let naive = NaiveDateTime::parse_from_str(value, fmt).ok()?;
                Some(Utc.from_utc_datetime(&naive).fixed_offset())
            }
            Pattern::Offset(fmt) => DateTime::parse_from_str(without_weekday(value), fmt).ok(),
            Pattern::Date(fmt) => {
                let date = NaiveDate::parse_from_str(value, fmt).ok()?;
                let midnight = date.and_hms_opt(0, 0, 0)?;
                self.offset.from_local_datetime(&midnight).single()
            }
            Pattern::Rfc3339 => DateTime::parse_from_rfc3339(value).ok(),
        }
    }
}

/// Drops an RFC 822 weekday prefix (`Mon, `); it is not checked against the date.
fn without_weekday(value: &str) -> &str {
    match value.split_once(',') {
        Some((day, rest)) if day.len() == 3 && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => value,
    }
}
