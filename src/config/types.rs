//! Core configuration types for product search
//!
//! This module contains the main `ScrapeConfig` struct that defines the
//! transport, render, fan-out and cache parameters of a search service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_ADAPTER_DEADLINE_SECS, DEFAULT_CACHE_CAPACITY,
    DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_REDIRECTS, DEFAULT_REFERRER,
    DEFAULT_RENDER_LOCALE, DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_RENDER_WINDOW,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TRUST_BUNDLE_PATH,
};

/// Main configuration struct for product search operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// User agent presented by both the transport and the headless browser
    pub(crate) user_agent: String,

    /// Referrer header presented by both the transport and the headless browser
    pub(crate) referrer: String,

    /// Timeout in seconds for one static fetch (connect + full body)
    ///
    /// Default: 8 seconds
    pub(crate) request_timeout_secs: u64,

    /// Response bodies are truncated at this many bytes
    ///
    /// Default: 1_200_000 bytes
    pub(crate) max_body_bytes: usize,

    /// Maximum redirects followed per fetch
    ///
    /// Default: 10
    pub(crate) max_redirects: usize,

    /// Deadline in seconds for one adapter, measured from dispatch
    ///
    /// Covers waiting for a worker, the static fetch and any fallback fetch.
    /// An adapter that misses it contributes an empty result.
    ///
    /// Default: 12 seconds
    pub(crate) adapter_deadline_secs: u64,

    /// Size of the fetch worker pool
    ///
    /// When unset the pool is `max(4, available_parallelism / 2)`.
    pub(crate) worker_count: Option<usize>,

    /// Freshness window in seconds of a cached result list
    ///
    /// Default: 300 seconds (5 minutes)
    pub(crate) cache_ttl_secs: u64,

    /// Maximum number of distinct queries kept by the cache (LRU)
    ///
    /// Default: 1024
    pub(crate) cache_capacity: usize,

    /// Seconds the render fallback waits for its ready selector
    ///
    /// Default: 15 seconds
    pub(crate) render_timeout_secs: u64,

    /// Headless browser viewport (width, height)
    pub(crate) render_window: (u32, u32),

    /// Headless browser locale, passed as `--lang`
    pub(crate) render_locale: String,

    /// Run the render fallback browser headless
    ///
    /// Default: true
    pub(crate) headless: bool,

    /// PEM bundle holding the trust anchors of the one retailer whose chain
    /// does not verify against the default roots
    pub(crate) trust_bundle_path: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: CHROME_USER_AGENT.to_string(),
            referrer: DEFAULT_REFERRER.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            adapter_deadline_secs: DEFAULT_ADAPTER_DEADLINE_SECS,
            worker_count: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            render_timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            render_window: DEFAULT_RENDER_WINDOW,
            render_locale: DEFAULT_RENDER_LOCALE.to_string(),
            headless: true,
            trust_bundle_path: PathBuf::from(DEFAULT_TRUST_BUNDLE_PATH),
        }
    }
}
