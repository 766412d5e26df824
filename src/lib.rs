//! Product price aggregation across Paraguayan online retailers
//!
//! A search fans out to every retailer adapter on a bounded worker pool,
//! merges whatever came back in time, keeps the listings whose name contains
//! the query and orders them cheapest first. Results are memoized per query
//! for a short TTL.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod product;
pub mod ranker;
pub mod render;
pub mod search;
pub mod transport;
pub mod utils;

pub use adapters::{
    AdapterError, Fallback, ListingLink, ListingSelectors, PageSource, SourceAdapter, SourceDescriptor,
    default_sources, fetch_products,
};
pub use cache::QueryCache;
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use orchestrator::{FetchOrchestrator, SourceOutcome, SourceStatus};
pub use product::{Product, SearchQuery};
pub use ranker::rank;
pub use search::{PriceSearch, SearchError, SearchResponse, SearchResult};
pub use transport::{Document, FetchError, FetchResult};

/// One-shot search with default configuration
///
/// Builds an engine, answers `query` and shuts the engine down. Prefer a
/// long-lived [`PriceSearch`] when serving more than one request, so the
/// cache and worker pool are shared.
pub async fn search_once(query: &str) -> SearchResponse {
    let config = ScrapeConfig::default();
    match PriceSearch::new(config) {
        Ok(engine) => {
            let response = engine.respond(query).await;
            engine.shutdown();
            response
        }
        Err(e) => SearchResponse::failed(query, e.user_message()),
    }
}
