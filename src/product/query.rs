//! Validated search text and its derived forms

use crate::search::SearchError;
use crate::utils::MAX_QUERY_LENGTH;

/// A trimmed, non-empty search term
///
/// Carries the three forms the pipeline needs: the raw text (name filter and
/// re-display), the URL-encoded text (outbound requests) and the lower-cased
/// text (cache key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    encoded: String,
    cache_key: String,
}

impl SearchQuery {
    /// Validate user input into a query
    ///
    /// Surrounding whitespace is trimmed. Besides blank input, terms longer
    /// than `MAX_QUERY_LENGTH` (200) characters are rejected, so some input
    /// a bare emptiness check would accept fails here.
    ///
    /// # Errors
    ///
    /// `SearchError::EmptyQuery` for empty or whitespace-only input,
    /// `SearchError::QueryTooLong` above `MAX_QUERY_LENGTH` characters.
    pub fn parse(input: &str) -> Result<Self, SearchError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let length = raw.chars().count();
        if length > MAX_QUERY_LENGTH {
            return Err(SearchError::QueryTooLong {
                length,
                max: MAX_QUERY_LENGTH,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            encoded: urlencoding::encode(raw).into_owned(),
            cache_key: raw.to_lowercase(),
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Case-insensitive, whitespace-trimmed key; accents are not folded
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}
