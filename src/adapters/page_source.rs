//! Where adapters get their pages from

use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::ScrapeConfig;
use crate::render::ChromeRenderer;
use crate::transport::{Document, FetchResult, HttpTransport, TrustedTransport};

/// The three ways a page can be obtained
///
/// Boxed futures keep the trait object-safe so the orchestrator can hold an
/// `Arc<dyn PageSource>` and tests can substitute canned pages.
pub trait PageSource: Send + Sync {
    /// Plain HTTP fetch with the default trust store
    fn fetch_static<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Document>>;

    /// HTTP fetch through the isolated trust store
    fn fetch_trusted<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Document>>;

    /// Headless-browser fetch that waits for `wait_for` up to `timeout`
    fn fetch_rendered<'a>(
        &'a self,
        url: &'a Url,
        wait_for: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, FetchResult<Document>>;
}

/// Network-backed page source used in production
#[derive(Debug)]
pub struct LivePageSource {
    transport: HttpTransport,
    trusted: TrustedTransport,
    renderer: ChromeRenderer,
}

impl LivePageSource {
    /// # Errors
    ///
    /// `FetchError::Client` if the default HTTP client cannot be built. The
    /// trusted client is built lazily and never fails construction.
    pub fn new(config: Arc<ScrapeConfig>) -> FetchResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(&config)?,
            trusted: TrustedTransport::new(Arc::clone(&config)),
            renderer: ChromeRenderer::new(config),
        })
    }
}

impl PageSource for LivePageSource {
    fn fetch_static<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Document>> {
        self.transport.fetch(url).boxed()
    }

    fn fetch_trusted<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Document>> {
        async move { self.trusted.get()?.fetch(url).await }.boxed()
    }

    fn fetch_rendered<'a>(
        &'a self,
        url: &'a Url,
        wait_for: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, FetchResult<Document>> {
        self.renderer.fetch_rendered(url, wait_for, timeout).boxed()
    }
}
