//! Trust-anchor override for a single retailer
//!
//! Loads one or more PEM certificates from a bundle, builds a client that
//! trusts only those, and hands the same client out for the life of the
//! process. Construction happens at most once even under concurrent first
//! use; a failed construction is remembered so the adapter degrades to the
//! default trust store instead of retrying on every request.

use once_cell::sync::OnceCell;
use reqwest::Certificate;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::client::HttpTransport;
use super::errors::{FetchError, FetchResult};
use crate::config::ScrapeConfig;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Read a PEM bundle from disk and parse every certificate block in it
///
/// # Errors
///
/// `FetchError::TrustStore` if the file cannot be read or holds no
/// certificate block.
pub fn load_trust_anchors(path: &Path) -> FetchResult<Vec<Certificate>> {
    let pem = std::fs::read(path).map_err(|e| {
        FetchError::TrustStore(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_trust_anchors(&pem)
        .map_err(|e| FetchError::TrustStore(format!("{}: {e}", path.display())))
}

/// Parse every `BEGIN/END CERTIFICATE` block of a PEM bundle
///
/// Text outside the blocks (comments, other PEM types) is ignored.
///
/// # Errors
///
/// `FetchError::TrustStore` if the bundle is not ASCII/UTF-8, holds no
/// certificate block, or a block is rejected.
pub fn parse_trust_anchors(pem: &[u8]) -> FetchResult<Vec<Certificate>> {
    let text = std::str::from_utf8(pem)
        .map_err(|e| FetchError::TrustStore(format!("bundle is not valid text: {e}")))?;

    let mut anchors = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(PEM_BEGIN) {
        let Some(end) = rest[start..].find(PEM_END) else {
            break;
        };
        let block_end = start + end + PEM_END.len();
        let block = &rest[start..block_end];

        let cert = Certificate::from_pem(block.as_bytes()).map_err(|e| {
            FetchError::TrustStore(format!("certificate #{} rejected: {e}", anchors.len()))
        })?;
        anchors.push(cert);
        rest = &rest[block_end..];
    }

    if anchors.is_empty() {
        return Err(FetchError::TrustStore(
            "no X.509 certificate blocks found".to_string(),
        ));
    }

    Ok(anchors)
}

/// Once-built transport that trusts only the configured bundle
///
/// Owned by the page source and shared read-only after construction.
#[derive(Debug)]
pub struct TrustedTransport {
    config: Arc<ScrapeConfig>,
    transport: OnceCell<Result<HttpTransport, String>>,
}

impl TrustedTransport {
    #[must_use]
    pub fn new(config: Arc<ScrapeConfig>) -> Self {
        Self {
            config,
            transport: OnceCell::new(),
        }
    }

    /// The isolated transport, built on first call
    ///
    /// # Errors
    ///
    /// `FetchError::TrustStore` if the bundle could not be loaded or the
    /// client could not be built; the same error is returned on every call.
    pub fn get(&self) -> FetchResult<&HttpTransport> {
        self.transport
            .get_or_init(|| {
                let path = self.config.trust_bundle_path();
                let built = load_trust_anchors(path).and_then(|anchors| {
                    info!(
                        "Loaded {} trust anchor(s) from {}",
                        anchors.len(),
                        path.display()
                    );
                    HttpTransport::with_trust_anchors(&self.config, anchors)
                });
                built.map_err(|e| {
                    warn!("Trust override disabled: {e}");
                    e.to_string()
                })
            })
            .as_ref()
            .map_err(|message| FetchError::TrustStore(message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_without_blocks_is_rejected() {
        let err = parse_trust_anchors(b"# just a comment\n").unwrap_err();
        assert!(matches!(err, FetchError::TrustStore(_)));
        assert!(err.to_string().contains("no X.509"));
    }

    #[test]
    fn unterminated_block_is_ignored() {
        let pem = format!("{PEM_BEGIN}\nMIIB\n");
        assert!(parse_trust_anchors(pem.as_bytes()).is_err());
    }

    #[test]
    fn missing_bundle_degrades_and_stays_degraded() {
        let config = ScrapeConfig::builder()
            .trust_bundle_path("/nonexistent/pricescrape/bundle.pem")
            .build()
            .unwrap();
        let trusted = TrustedTransport::new(Arc::new(config));

        let first = trusted.get().unwrap_err();
        let second = trusted.get().unwrap_err();
        assert!(matches!(first, FetchError::TrustStore(_)));
        assert_eq!(first.to_string(), second.to_string());
    }
}
