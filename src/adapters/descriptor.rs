//! Per-source static description

use std::time::Duration;
use url::Url;

use super::errors::AdapterError;
use crate::product::SearchQuery;
use crate::utils::host_of;

/// What an adapter does when its static fetch is not enough
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Static fetch only; an empty page is an empty result
    None,

    /// Render with a headless browser when the static page lacks
    /// `ready_selector` or the TLS handshake fails
    Rendered {
        ready_selector: String,
        timeout: Duration,
    },

    /// Retry the same request with the isolated trust store when the TLS
    /// handshake fails
    TrustedTls,
}

/// How the per-listing `source_url` is reconstructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingLink {
    /// `base + path + urlencode(product name)`
    ByName,
    /// `base + path + encoded query`
    ByQuery,
}

/// Immutable identity of one retailer
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    name: String,
    base: String,
    base_url: Url,
    search_path: String,
    fallback: Fallback,
    link: ListingLink,
}

impl SourceDescriptor {
    /// # Errors
    ///
    /// `AdapterError::Url` if `base` is not an absolute URL with a host.
    pub fn new(
        name: impl Into<String>,
        base: impl Into<String>,
        search_path: impl Into<String>,
        fallback: Fallback,
        link: ListingLink,
    ) -> Result<Self, AdapterError> {
        let base = base.into().trim_end_matches('/').to_string();
        let base_url = Url::parse(&base).map_err(|e| AdapterError::Url {
            url: base.clone(),
            message: e.to_string(),
        })?;
        if base_url.host_str().is_none() {
            return Err(AdapterError::Url {
                url: base,
                message: "base URL has no host".to_string(),
            });
        }

        Ok(Self {
            name: name.into(),
            base,
            base_url,
            search_path: search_path.into(),
            fallback,
            link,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// Host recorded as every product's origin
    #[must_use]
    pub fn origin_host(&self) -> String {
        host_of(&self.base_url)
    }

    /// # Errors
    ///
    /// `AdapterError::Url` if the concatenation does not parse.
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url, AdapterError> {
        let raw = format!("{}{}{}", self.base, self.search_path, query.encoded());
        Url::parse(&raw).map_err(|e| AdapterError::Url {
            url: raw,
            message: e.to_string(),
        })
    }

    /// Best-effort page URL for a listing named `name`
    #[must_use]
    pub fn listing_url(&self, name: &str, query: &SearchQuery) -> String {
        match self.link {
            ListingLink::ByName => format!(
                "{}{}{}",
                self.base,
                self.search_path,
                urlencoding::encode(name)
            ),
            ListingLink::ByQuery => {
                format!("{}{}{}", self.base, self.search_path, query.encoded())
            }
        }
    }
}
