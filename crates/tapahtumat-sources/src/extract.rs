//! Alias-priority field extraction.
//!
//! Sources name the same field differently (`title`, `nimi`, `otsikko`, ...).
//! Adapters list the candidates in priority order and [`extract`] returns the
//! first non-empty hit. The same contract covers JSON objects (aliases are
//! keys) and HTML elements (aliases are CSS selectors).

use scraper::{ElementRef, Selector};
use serde_json::{Map, Value};

/// A record that can be queried by alias.
pub trait FieldLookup {
    /// Returns the trimmed, non-empty value for one alias.
    fn lookup(&self, alias: &str) -> Option<String>;
}

/// Returns the first alias with a non-empty value.
pub fn extract<R: FieldLookup + ?Sized>(record: &R, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| record.lookup(alias))
}

impl FieldLookup for Map<String, Value> {
    fn lookup(&self, alias: &str) -> Option<String> {
        match self.get(alias)? {
            Value::String(s) => non_empty(s.trim()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// An HTML element queried with CSS selectors.
#[derive(Clone, Copy)]
pub struct ElementFields<'a> {
    element: ElementRef<'a>,
    attribute: Option<&'static str>,
}

impl<'a> ElementFields<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self {
            element,
            attribute: None,
        }
    }

    /// Prefers `attribute` on the matched element over its text.
    pub fn preferring(mut self, attribute: &'static str) -> Self {
        self.attribute = Some(attribute);
        self
    }
}

impl FieldLookup for ElementFields<'_> {
    fn lookup(&self, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        let found = self.element.select(&selector).next()?;

        if let Some(value) = self
            .attribute
            .and_then(|name| found.value().attr(name))
            .and_then(|v| non_empty(v.trim()))
        {
            return Some(value);
        }

        non_empty(&element_text(found))
    }
}

/// Returns the element's text with runs of whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
