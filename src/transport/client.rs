//! reqwest-backed static fetch

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use reqwest::{Certificate, Client, ClientBuilder, Response, redirect};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use super::document::Document;
use super::errors::{FetchError, FetchResult};
use crate::config::ScrapeConfig;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// HTTP transport with fixed headers, timeout, body cap and redirect policy
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted and
/// pools connections across clones.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpTransport {
    /// Transport using the default trust roots
    ///
    /// # Errors
    ///
    /// `FetchError::Client` if a header value is not representable or the
    /// TLS backend fails to initialize.
    pub fn new(config: &ScrapeConfig) -> FetchResult<Self> {
        Self::from_builder(base_builder(config)?, config)
    }

    /// Transport that trusts `anchors` and nothing else
    ///
    /// Built-in roots are disabled on this client only; every other client
    /// keeps the default trust store.
    ///
    /// # Errors
    ///
    /// `FetchError::TrustStore` if `anchors` is empty or a certificate is
    /// rejected by the TLS backend.
    pub fn with_trust_anchors(config: &ScrapeConfig, anchors: Vec<Certificate>) -> FetchResult<Self> {
        if anchors.is_empty() {
            return Err(FetchError::TrustStore(
                "no trust anchors supplied".to_string(),
            ));
        }

        let builder = anchors.into_iter().fold(
            base_builder(config)?.tls_built_in_root_certs(false),
            ClientBuilder::add_root_certificate,
        );

        Self::from_builder(builder, config)
            .map_err(|e| FetchError::TrustStore(e.to_string()))
    }

    fn from_builder(builder: ClientBuilder, config: &ScrapeConfig) -> FetchResult<Self> {
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.request_timeout(),
            max_body_bytes: config.max_body_bytes(),
        })
    }

    /// Fetch `url` and return the (possibly truncated) page source
    ///
    /// # Errors
    ///
    /// `FetchError::Tls` on handshake failure, `FetchError::Timeout`,
    /// `FetchError::Status` for non-2xx answers and `FetchError::Io` for
    /// everything else.
    pub async fn fetch(&self, url: &Url) -> FetchResult<Document> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, url, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = self.read_capped(response, url).await?;
        trace!("Fetched {} bytes from {final_url}", body.len());

        Ok(Document::new(
            final_url,
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }

    /// Read the body chunk by chunk, stopping at `max_body_bytes`
    async fn read_capped(&self, mut response: Response, url: &Url) -> FetchResult<Vec<u8>> {
        let expected = response
            .content_length()
            .map_or(0, |len| usize::try_from(len).unwrap_or(usize::MAX));
        let mut body = Vec::with_capacity(expected.min(self.max_body_bytes));

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, url, self.timeout))?
        {
            let room = self.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(
                    "Body of {url} truncated at {} bytes",
                    self.max_body_bytes
                );
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

fn base_builder(config: &ScrapeConfig) -> FetchResult<ClientBuilder> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value(&format!("{},es;q=0.9,en;q=0.8", config.render_locale()))?,
    );
    headers.insert(REFERER, header_value(config.referrer())?);

    Ok(Client::builder()
        .user_agent(config.user_agent())
        .default_headers(headers)
        .timeout(config.request_timeout())
        .redirect(redirect::Policy::limited(config.max_redirects())))
}

fn header_value(value: &str) -> FetchResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| FetchError::Client(format!("invalid header value '{value}': {e}")))
}
