//! Core types: canonical events, date normalization, rendering, tracing

pub mod event;
pub mod format;
pub mod time;
pub mod tracing;

pub use event::{DEFAULT_REGION, Event, Timestamp, sorted_by_start};
pub use format::{
    Artifact, JsonEvent, JsonSnapshot, PageContext, RenderError, ellipsis, html_escape,
    render_all, render_calendar, render_page, render_snapshot,
};
pub use time::{DEFAULT_UTC_OFFSET_HOURS, DateNormalizer};
pub use tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
