//! Source adapters
//!
//! One adapter per retailer, all behind the [`SourceAdapter`] capability.
//! An adapter only describes a source: how to build its search URL, which
//! fallback it may use, when its static page needs that fallback and how to
//! turn a page into products. [`fetch_products`] runs the two-stage fetch
//! (static first, then the fallback) against any [`PageSource`], so tests can
//! drive adapters with canned documents.

mod descriptor;
mod embedded_json;
mod errors;
mod extract;
mod page_source;
mod selector;
mod sources;
mod strategy;

pub use descriptor::{Fallback, ListingLink, SourceDescriptor};
pub use embedded_json::{EmbeddedJsonAdapter, normalize_script_escapes};
pub use errors::AdapterError;
pub use extract::{element_text, parse_price, resolve_image};
pub use page_source::{LivePageSource, PageSource};
pub use selector::{ListingSelectors, SelectorAdapter};
pub use sources::default_sources;
pub use strategy::fetch_products;

use url::Url;

use crate::product::{Product, SearchQuery};
use crate::transport::Document;

/// Capability shared by every retailer adapter
pub trait SourceAdapter: Send + Sync {
    /// Static description of the source: name, URLs, fallback, link style
    fn descriptor(&self) -> &SourceDescriptor;

    /// Whether a successfully fetched static page lacks the content this
    /// source needs, so the rendered fallback should be tried
    fn needs_rendering(&self, page: &Document) -> bool;

    /// Turn a page into products; malformed items get sentinel values
    /// instead of being dropped
    fn extract(&self, page: &Document, query: &SearchQuery) -> Vec<Product>;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn fallback(&self) -> &Fallback {
        self.descriptor().fallback()
    }

    /// # Errors
    ///
    /// `AdapterError::Url` if the base URL, path and encoded query do not
    /// form a valid URL.
    fn search_url(&self, query: &SearchQuery) -> Result<Url, AdapterError> {
        self.descriptor().search_url(query)
    }
}
