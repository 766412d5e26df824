//! Fluent builder for `ScrapeConfig`
//!
//! Every field has a default, so the builder only validates: zero timeouts,
//! caps or capacities are rejected at `build()` time instead of surfacing as
//! instant failures deep in the fetch path.

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use super::types::ScrapeConfig;

pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self {
            config: ScrapeConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.config.referrer = referrer.into();
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, redirects: usize) -> Self {
        self.config.max_redirects = redirects;
        self
    }

    #[must_use]
    pub fn adapter_deadline_secs(mut self, secs: u64) -> Self {
        self.config.adapter_deadline_secs = secs;
        self
    }

    #[must_use]
    pub fn worker_count(mut self, workers: usize) -> Self {
        self.config.worker_count = Some(workers);
        self
    }

    #[must_use]
    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.cache_ttl_secs = secs;
        self
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn render_window(mut self, width: u32, height: u32) -> Self {
        self.config.render_window = (width, height);
        self
    }

    #[must_use]
    pub fn render_locale(mut self, locale: impl Into<String>) -> Self {
        self.config.render_locale = locale.into();
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn trust_bundle_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.trust_bundle_path = path.into();
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any timeout, size limit, pool size or cache
    /// capacity is zero, or if the user agent is blank.
    pub fn build(self) -> Result<ScrapeConfig> {
        let config = self.config;

        let non_zero: [(&str, u64); 6] = [
            ("request_timeout_secs", config.request_timeout_secs),
            ("max_body_bytes", config.max_body_bytes as u64),
            ("adapter_deadline_secs", config.adapter_deadline_secs),
            ("cache_ttl_secs", config.cache_ttl_secs),
            ("cache_capacity", config.cache_capacity as u64),
            ("render_timeout_secs", config.render_timeout_secs),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(anyhow!("{field} must be greater than zero"));
            }
        }

        if config.worker_count == Some(0) {
            return Err(anyhow!("worker_count must be greater than zero"));
        }

        if config.render_window.0 == 0 || config.render_window.1 == 0 {
            return Err(anyhow!(
                "render_window must be non-empty, got {}x{}",
                config.render_window.0,
                config.render_window.1
            ));
        }

        if config.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent cannot be blank"));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_match_documented_budgets() {
        let config = ScrapeConfig::builder().build().unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(8));
        assert_eq!(config.max_body_bytes(), 1_200_000);
        assert_eq!(config.adapter_deadline(), Duration::from_secs(12));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.render_timeout(), Duration::from_secs(15));
        assert_eq!(config.render_window(), (1366, 768));
        assert!(config.headless());
        assert!(config.worker_count() >= 4);
    }

    #[test]
    fn rejects_zero_values() {
        assert!(ScrapeConfig::builder().request_timeout_secs(0).build().is_err());
        assert!(ScrapeConfig::builder().cache_capacity(0).build().is_err());
        assert!(ScrapeConfig::builder().worker_count(0).build().is_err());
        assert!(ScrapeConfig::builder().render_window(0, 768).build().is_err());
        assert!(ScrapeConfig::builder().user_agent("  ").build().is_err());
    }

    #[test]
    fn explicit_worker_count_wins() {
        let config = ScrapeConfig::builder().worker_count(2).build().unwrap();
        assert_eq!(config.worker_count(), 2);
    }
}
