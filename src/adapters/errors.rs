//! Error type for adapter construction and execution

use thiserror::Error;

use crate::transport::FetchError;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// Static or fallback fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A CSS selector in the source's rules does not parse
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Base URL or search URL is malformed
    #[error("Invalid URL '{url}': {message}")]
    Url { url: String, message: String },
}

impl AdapterError {
    /// Whether the adapter failed because a fetch ran out of time
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, AdapterError::Fetch(e) if e.is_timeout())
    }
}
