//! Response shapes returned to callers

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// What the front end renders for one search
///
/// `query` is the text as typed, kept for re-display. `error` is set only
/// when the search could not run; an empty `products` with no `error` means
/// nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn found(query: &str, products: Vec<Product>) -> Self {
        Self {
            query: query.to_string(),
            products,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(query: &str, message: impl Into<String>) -> Self {
        Self {
            query: query.to_string(),
            products: Vec::new(),
            error: Some(message.into()),
        }
    }
}
