//! Shared configuration constants for pricescrape
//!
//! Default values used by the configuration builder, the transport and the
//! render fallback, kept in one place to avoid magic numbers.

/// Desktop Chrome user agent sent by the transport and the render fallback
pub const CHROME_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120 Safari/537.36";

/// Referrer header sent with every static fetch and browser navigation
pub const DEFAULT_REFERRER: &str = "https://www.google.com";

/// Static fetch timeout: 8 seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 8;

/// Response body cap: ~1.2 MB; longer bodies are truncated
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_200_000;

/// Maximum redirects followed by the transport
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Deadline for one adapter, measured from dispatch: 12 seconds
pub const DEFAULT_ADAPTER_DEADLINE_SECS: u64 = 12;

/// Lower bound of the fetch worker pool
pub const MIN_WORKERS: usize = 4;

/// Freshness window of a cached result list: 5 minutes
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

/// Maximum number of distinct queries held by the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Wait-for-selector budget of the render fallback: 15 seconds
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 15;

/// Render fallback viewport
pub const DEFAULT_RENDER_WINDOW: (u32, u32) = (1366, 768);

/// Render fallback locale
pub const DEFAULT_RENDER_LOCALE: &str = "es-ES";

/// Bundled PEM certificate(s) for the one retailer with a non-standard chain
pub const DEFAULT_TRUST_BUNDLE_PATH: &str = "resources/ssl/farmacenter.pem";

/// Currency label attached to every product
pub const CURRENCY_LABEL: &str = "GS";

/// Sentinel name for an item whose name element is missing or blank
pub const MISSING_NAME: &str = "NN";

/// Longest accepted search query, in characters
pub const MAX_QUERY_LENGTH: usize = 200;
