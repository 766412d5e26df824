//! The `Product` value type

use serde::{Deserialize, Serialize};

use crate::utils::CURRENCY_LABEL;

/// One product listing, normalized from a retailer page
///
/// Immutable once constructed. Two listings are the same product only if
/// every field matches; the same item sold by two retailers stays two
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Listing title as shown by the retailer
    name: String,

    /// Price in the smallest currency unit, 0 when the price text had no digits
    price: u64,

    /// Fixed currency label
    currency_label: String,

    /// Absolute image URL, or the raw attribute value, or empty
    image_url: String,

    /// Host of the retailer that produced the listing
    origin_host: String,

    /// Best-effort page URL for the listing (not guaranteed canonical)
    source_url: String,
}

impl Product {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: u64,
        image_url: impl Into<String>,
        origin_host: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            currency_label: CURRENCY_LABEL.to_string(),
            image_url: image_url.into(),
            origin_host: origin_host.into(),
            source_url: source_url.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn price(&self) -> u64 {
        self.price
    }

    #[must_use]
    pub fn currency_label(&self) -> &str {
        &self.currency_label
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub fn origin_host(&self) -> &str {
        &self.origin_host
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}
