//! Field-level extraction helpers shared by the selector adapters

use scraper::{ElementRef, Selector};
use url::Url;

use super::errors::AdapterError;
use crate::utils::absolutize;

/// Currency tokens removed before looking for digits
const CURRENCY_TOKENS: &[&str] = &["₲", "PYG", "Gs", "GS", "gs"];

/// Image attributes in order of preference (lazy-load attributes first)
const IMAGE_ATTRIBUTES: [&str; 3] = ["data-src", "data-original", "src"];

/// Parse a price label into an integer amount
///
/// Thousands separators and currency tokens are stripped, then the first run
/// of ASCII digits is taken. Labels without digits (or with an amount that
/// does not fit in `u64`) are priced 0 rather than rejected.
#[must_use]
pub fn parse_price(raw: &str) -> u64 {
    let mut cleaned = raw.replace(['.', ','], "");
    for token in CURRENCY_TOKENS {
        cleaned = cleaned.replace(token, "");
    }

    cleaned
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .and_then(|run| run.parse().ok())
        .unwrap_or(0)
}

/// Resolve the image URL of an `<img>`-like element
///
/// Prefers the absolute form of `data-src`, `data-original`, then `src`; if
/// none resolves to an http(s) URL, falls back to the first non-empty raw
/// value in the same order; otherwise empty.
#[must_use]
pub fn resolve_image(element: &ElementRef<'_>, base: &Url) -> String {
    let raw_values = || {
        IMAGE_ATTRIBUTES
            .iter()
            .filter_map(|attr| element.value().attr(attr))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    raw_values()
        .find_map(|value| absolutize(base, value))
        .or_else(|| raw_values().next().map(str::to_string))
        .unwrap_or_default()
}

/// Visible text of an element with whitespace collapsed
#[must_use]
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn compile_selector(selector: &str) -> Result<Selector, AdapterError> {
    Selector::parse(selector).map_err(|e| AdapterError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
