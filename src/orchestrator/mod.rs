//! Concurrent fan-out over the source adapters
//!
//! Every adapter runs in its own task on a bounded worker pool. A task's
//! deadline starts when it is dispatched, so time spent waiting for a free
//! worker counts against it. Failures, timeouts and panics are contained to
//! the adapter that caused them and surface as an empty result. Dropping a
//! search mid-flight drops its join set, which aborts the remaining tasks.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{debug, error, info, warn};

use crate::adapters::{PageSource, SourceAdapter, fetch_products};
use crate::config::ScrapeConfig;
use crate::product::{Product, SearchQuery};

/// How one adapter's run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Completed; carries the number of products extracted
    Succeeded(usize),
    /// Fetch or extraction failed, or the task panicked
    Failed(String),
    /// Did not finish within the per-adapter deadline
    TimedOut,
}

/// Result of one adapter for one query
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub source: String,
    pub status: SourceStatus,
    pub products: Vec<Product>,
}

impl SourceOutcome {
    fn succeeded(source: String, products: Vec<Product>) -> Self {
        Self {
            source,
            status: SourceStatus::Succeeded(products.len()),
            products,
        }
    }

    fn failed(source: String, message: String) -> Self {
        Self {
            source,
            status: SourceStatus::Failed(message),
            products: Vec::new(),
        }
    }

    fn timed_out(source: String) -> Self {
        Self {
            source,
            status: SourceStatus::TimedOut,
            products: Vec::new(),
        }
    }
}

/// Bounded worker pool shared by every search
pub struct FetchOrchestrator {
    workers: Arc<Semaphore>,
    pages: Arc<dyn PageSource>,
    deadline: Duration,
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new(config: &ScrapeConfig, pages: Arc<dyn PageSource>) -> Self {
        let workers = config.worker_count();
        debug!("Fetch pool sized at {workers} worker(s)");
        Self {
            workers: Arc::new(Semaphore::new(workers)),
            pages,
            deadline: config.adapter_deadline(),
        }
    }

    /// Run every adapter for `query` and collect outcomes in registry order
    ///
    /// Never fails: a source that errors, panics or exceeds the deadline
    /// yields an outcome with no products.
    pub async fn run(
        &self,
        adapters: &[Arc<dyn SourceAdapter>],
        query: &SearchQuery,
    ) -> Vec<SourceOutcome> {
        let mut tasks = JoinSet::new();
        let mut slots: HashMap<task::Id, usize> = HashMap::with_capacity(adapters.len());
        for (index, adapter) in adapters.iter().enumerate() {
            let handle = tasks.spawn(run_adapter(
                Arc::clone(adapter),
                Arc::clone(&self.pages),
                Arc::clone(&self.workers),
                query.clone(),
                self.deadline,
            ));
            slots.insert(handle.id(), index);
        }

        let mut finished: Vec<Option<SourceOutcome>> = vec![None; adapters.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => {
                    let Some(&index) = slots.get(&e.id()) else {
                        continue;
                    };
                    let name = adapters[index].name().to_string();
                    if e.is_panic() {
                        error!("{name}: adapter task panicked");
                        (e.id(), SourceOutcome::failed(name, "adapter panicked".to_string()))
                    } else {
                        warn!("{name}: adapter task cancelled");
                        (e.id(), SourceOutcome::failed(name, e.to_string()))
                    }
                }
            };
            if let Some(&index) = slots.get(&id) {
                finished[index] = Some(outcome);
            }
        }

        let outcomes: Vec<SourceOutcome> = finished
            .into_iter()
            .zip(adapters)
            .map(|(outcome, adapter)| {
                outcome.unwrap_or_else(|| {
                    SourceOutcome::failed(adapter.name().to_string(), "no result".to_string())
                })
            })
            .collect();

        let total: usize = outcomes.iter().map(|o| o.products.len()).sum();
        info!(
            "'{}': {total} product(s) from {} source(s)",
            query.raw(),
            outcomes.len()
        );
        outcomes
    }

    /// Stop accepting work; tasks already holding a worker finish normally
    pub fn shutdown(&self) {
        self.workers.close();
        info!("Fetch pool shut down");
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.workers.is_closed()
    }
}

async fn run_adapter(
    adapter: Arc<dyn SourceAdapter>,
    pages: Arc<dyn PageSource>,
    workers: Arc<Semaphore>,
    query: SearchQuery,
    deadline: Duration,
) -> SourceOutcome {
    let name = adapter.name().to_string();

    let attempt = async {
        let _permit = workers
            .acquire()
            .await
            .map_err(|_| "worker pool is shut down".to_string())?;
        fetch_products(adapter.as_ref(), pages.as_ref(), &query)
            .await
            .map_err(|e| e.to_string())
    };

    match tokio::time::timeout(deadline, attempt).await {
        Ok(Ok(products)) => {
            debug!("{name}: {} product(s)", products.len());
            SourceOutcome::succeeded(name, products)
        }
        Ok(Err(message)) => {
            warn!("{name}: {message}");
            SourceOutcome::failed(name, message)
        }
        Err(_) => {
            warn!("{name}: no result within {deadline:?}");
            SourceOutcome::timed_out(name)
        }
    }
}
