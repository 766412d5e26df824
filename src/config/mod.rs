//! Configuration module for product search
//!
//! This module provides the `ScrapeConfig` struct and its builder for
//! configuring the transport, render fallback, fan-out and cache with
//! validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::ScrapeConfigBuilder;
pub use types::ScrapeConfig;
