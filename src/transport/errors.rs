//! Error types for page fetches
//!
//! Covers both the static transport and the render fallback so an adapter
//! sees one error type whichever strategy it used.

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// TLS handshake or certificate verification failed
    #[error("TLS handshake with {url} failed: {message}")]
    Tls { url: String, message: String },

    /// The request did not complete within the transport timeout
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// The server answered with a non-2xx status
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// Connection, protocol or body read failure
    #[error("I/O error fetching {url}: {message}")]
    Io { url: String, message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Browser launch, navigation or content capture failed
    #[error("Browser error: {0}")]
    Browser(String),

    /// The render fallback's ready selector never appeared
    #[error("Timed out after {timeout:?} waiting for '{selector}' on {url}")]
    RenderTimeout {
        url: String,
        selector: String,
        timeout: Duration,
    },

    /// The trust-anchor override could not be initialized
    #[error("Trust store unavailable: {0}")]
    TrustStore(String),
}

impl FetchError {
    /// Whether this is a TLS handshake failure rather than a generic one
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, FetchError::Tls { .. })
    }

    /// Whether the failure was a timeout of either fetch strategy
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout { .. } | FetchError::RenderTimeout { .. }
        )
    }

    /// Classify a reqwest failure for `url`
    pub(crate) fn from_reqwest(err: &reqwest::Error, url: &Url, timeout: Duration) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            return FetchError::Timeout { url, timeout };
        }
        if let Some(status) = err.status() {
            return FetchError::Status {
                url,
                status: status.as_u16(),
            };
        }

        let message = error_chain(err);
        if is_tls_failure(err) {
            FetchError::Tls { url, message }
        } else {
            FetchError::Io { url, message }
        }
    }
}

/// Render an error and all of its sources as `outer: inner: root`
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Whether a rustls error sits anywhere below `err`
///
/// Only the sources are inspected, never their text: the outer reqwest error
/// carries the request URL, which holds the user's query.
fn is_tls_failure(err: &dyn StdError) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.is::<rustls::Error>() {
            return true;
        }
        // io::Error::source skips the wrapped error, so look inside directly
        if let Some(io) = inner.downcast_ref::<std::io::Error>()
            && io.get_ref().is_some_and(|wrapped| wrapped.is::<rustls::Error>())
        {
            return true;
        }
        source = inner.source();
    }
    false
}
