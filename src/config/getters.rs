//! Getter methods for `ScrapeConfig`

use std::path::Path;
use std::time::Duration;

use super::types::ScrapeConfig;
use crate::utils::MIN_WORKERS;

impl ScrapeConfig {
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    #[must_use]
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    #[must_use]
    pub fn adapter_deadline(&self) -> Duration {
        Duration::from_secs(self.adapter_deadline_secs)
    }

    /// Worker pool size: the configured value, or `max(4, cpus / 2)`
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_count
            .unwrap_or_else(|| MIN_WORKERS.max(num_cpus::get() / 2))
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    #[must_use]
    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    #[must_use]
    pub fn render_window(&self) -> (u32, u32) {
        self.render_window
    }

    #[must_use]
    pub fn render_locale(&self) -> &str {
        &self.render_locale
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn trust_bundle_path(&self) -> &Path {
        &self.trust_bundle_path
    }
}
