//! Search entry point: validate, consult the cache, fan out, merge and rank

mod errors;
mod types;

pub use errors::{SearchError, SearchResult};
pub use types::SearchResponse;

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::adapters::{LivePageSource, PageSource, SourceAdapter, default_sources};
use crate::cache::QueryCache;
use crate::config::ScrapeConfig;
use crate::orchestrator::{FetchOrchestrator, SourceOutcome};
use crate::product::{Product, SearchQuery};
use crate::ranker::rank;

/// The aggregation engine behind the single `search` operation
///
/// Holds the adapter registry, the shared worker pool and the query cache.
/// One instance serves any number of concurrent searches.
pub struct PriceSearch {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    orchestrator: FetchOrchestrator,
    cache: QueryCache,
}

impl PriceSearch {
    /// Engine over the built-in retailer catalogue and live network access
    ///
    /// # Errors
    ///
    /// `SearchError::Unavailable` if the HTTP client or a catalogue entry
    /// cannot be built.
    pub fn new(config: ScrapeConfig) -> SearchResult<Self> {
        let config = Arc::new(config);
        let pages = LivePageSource::new(Arc::clone(&config))
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        let adapters =
            default_sources(&config).map_err(|e| SearchError::Unavailable(e.to_string()))?;
        Ok(Self::with_parts(&config, Arc::new(pages), adapters))
    }

    /// Engine over arbitrary adapters and page source
    #[must_use]
    pub fn with_parts(
        config: &ScrapeConfig,
        pages: Arc<dyn PageSource>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
    ) -> Self {
        info!("Search engine ready with {} source(s)", adapters.len());
        Self {
            adapters,
            orchestrator: FetchOrchestrator::new(config, pages),
            cache: QueryCache::new(config.cache_capacity(), config.cache_ttl()),
        }
    }

    /// Ranked products for `raw`
    ///
    /// Source failures only shrink the result. Within the cache TTL, repeat
    /// queries (compared case-insensitively after trimming) are answered
    /// without contacting any source.
    ///
    /// # Errors
    ///
    /// `EmptyQuery`/`QueryTooLong` for invalid input, before any fetch;
    /// `Unavailable` if the pipeline itself fails.
    pub async fn search(&self, raw: &str) -> SearchResult<Vec<Product>> {
        let query = SearchQuery::parse(raw)?;

        if let Some(products) = self.cache.get(query.cache_key()) {
            debug!("Serving '{}' from cache", query.raw());
            return Ok(products);
        }

        let ranked = AssertUnwindSafe(self.aggregate(&query))
            .catch_unwind()
            .await
            .map_err(|panic| {
                let reason = panic_message(panic.as_ref());
                error!("Search for '{}' failed: {reason}", query.raw());
                SearchError::Unavailable(reason)
            })?;

        if !self.orchestrator.is_shut_down() {
            self.cache.put(query.cache_key(), ranked.clone());
        }
        Ok(ranked)
    }

    /// Like [`search`](Self::search), but never fails
    ///
    /// Errors become a user-facing message in the response; the query text
    /// is echoed back as typed.
    pub async fn respond(&self, raw: &str) -> SearchResponse {
        match self.search(raw).await {
            Ok(products) => SearchResponse::found(raw, products),
            Err(e) => {
                if e.is_invalid_input() {
                    debug!("Rejected query: {e}");
                } else {
                    warn!("{e}");
                }
                SearchResponse::failed(raw, e.user_message())
            }
        }
    }

    /// Per-source report for `raw`, bypassing the cache
    ///
    /// # Errors
    ///
    /// `EmptyQuery`/`QueryTooLong` for invalid input.
    pub async fn probe(&self, raw: &str) -> SearchResult<Vec<SourceOutcome>> {
        let query = SearchQuery::parse(raw)?;
        Ok(self.orchestrator.run(&self.adapters, &query).await)
    }

    /// Close the worker pool; later searches get no results from any source
    pub fn shutdown(&self) {
        self.orchestrator.shutdown();
    }

    #[must_use]
    pub fn sources(&self) -> Vec<&str> {
        self.adapters.iter().map(|adapter| adapter.name()).collect()
    }

    async fn aggregate(&self, query: &SearchQuery) -> Vec<Product> {
        let outcomes = self.orchestrator.run(&self.adapters, query).await;
        let merged: Vec<Product> = outcomes
            .into_iter()
            .flat_map(|outcome| outcome.products)
            .collect();
        let before = merged.len();
        let ranked = rank(merged, query.raw());
        debug!(
            "'{}': kept {} of {before} product(s)",
            query.raw(),
            ranked.len()
        );
        ranked
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unexpected failure".to_string())
}
