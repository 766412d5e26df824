//! Lightweight HTTP transport
//!
//! One fetch per call with fixed browser-like headers, a bounded timeout, a
//! capped body and followed redirects. TLS handshake failures are reported
//! separately from other I/O failures so adapters can decide on a fallback.
//! The trust-anchor override builds an isolated client for the one retailer
//! whose certificate chain does not verify against the default roots.

mod client;
mod document;
mod errors;
mod trust;

pub use client::HttpTransport;
pub use document::Document;
pub use errors::{FetchError, FetchResult};
pub use trust::{TrustedTransport, load_trust_anchors, parse_trust_anchors};
