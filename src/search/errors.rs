//! Caller-facing search errors

use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Why a search produced no answer
///
/// Source failures are not errors: they shrink the result set instead. Only
/// invalid input and a failure of the pipeline itself reach the caller.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Query was empty after trimming
    #[error("Search query is empty")]
    EmptyQuery,

    /// Query exceeds the accepted length
    #[error("Search query is {length} characters long, the maximum is {max}")]
    QueryTooLong { length: usize, max: usize },

    /// The pipeline failed as a whole
    #[error("Search unavailable: {0}")]
    Unavailable(String),
}

impl SearchError {
    /// Text suitable for showing to the person who searched
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "Enter a search term.",
            Self::QueryTooLong { .. } => "The search term is too long.",
            Self::Unavailable(_) => "We could not complete the search. Please try again later.",
        }
    }

    /// Whether the error was caused by the input rather than the system
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::QueryTooLong { .. })
    }
}
