//! Test utilities shared by the pricescrape integration tests

use futures::FutureExt;
use futures::future::BoxFuture;
use kodegen_tools_pricescrape::adapters::{SelectorAdapter, SourceAdapter};
use kodegen_tools_pricescrape::{
    Document, Fallback, FetchError, FetchResult, ListingLink, ListingSelectors, PageSource,
    ScrapeConfig, SourceDescriptor,
};
use mockito::{Mock, Server};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Canned answer for one host
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub enum Reply {
    Html(String),
    Slow(Duration, String),
    Tls,
    Status(u16),
    RenderTimeout,
    Panic,
}

/// In-memory page source keyed by host, counting every call
#[derive(Default)]
pub struct FakePageSource {
    static_pages: HashMap<String, Reply>,
    trusted_pages: HashMap<String, Reply>,
    rendered_pages: HashMap<String, Reply>,
    pub static_calls: AtomicUsize,
    pub trusted_calls: AtomicUsize,
    pub rendered_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakePageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_static(mut self, host: &str, reply: Reply) -> Self {
        self.static_pages.insert(host.to_string(), reply);
        self
    }

    pub fn on_trusted(mut self, host: &str, reply: Reply) -> Self {
        self.trusted_pages.insert(host.to_string(), reply);
        self
    }

    pub fn on_rendered(mut self, host: &str, reply: Reply) -> Self {
        self.rendered_pages.insert(host.to_string(), reply);
        self
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.static_calls.load(Ordering::SeqCst),
            self.trusted_calls.load(Ordering::SeqCst),
            self.rendered_calls.load(Ordering::SeqCst),
        )
    }

    async fn answer(pages: &HashMap<String, Reply>, url: &Url) -> FetchResult<Document> {
        let host = url.host_str().unwrap_or_default();
        match pages.get(host).cloned() {
            Some(Reply::Html(html)) => Ok(Document::new(url.clone(), html)),
            Some(Reply::Slow(delay, html)) => {
                tokio::time::sleep(delay).await;
                Ok(Document::new(url.clone(), html))
            }
            Some(Reply::Tls) => Err(FetchError::Tls {
                url: url.to_string(),
                message: "invalid peer certificate: UnknownIssuer".to_string(),
            }),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Reply::RenderTimeout) => Err(FetchError::RenderTimeout {
                url: url.to_string(),
                selector: "div.ready".to_string(),
                timeout: Duration::from_secs(15),
            }),
            Some(Reply::Panic) => panic!("page source exploded for {host}"),
            None => Err(FetchError::Io {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

impl PageSource for FakePageSource {
    fn fetch_static<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Document>> {
        self.static_calls.fetch_add(1, Ordering::SeqCst);
        Self::answer(&self.static_pages, url).boxed()
    }

    fn fetch_trusted<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Document>> {
        self.trusted_calls.fetch_add(1, Ordering::SeqCst);
        Self::answer(&self.trusted_pages, url).boxed()
    }

    fn fetch_rendered<'a>(
        &'a self,
        url: &'a Url,
        _wait_for: &'a str,
        _timeout: Duration,
    ) -> BoxFuture<'a, FetchResult<Document>> {
        self.rendered_calls.fetch_add(1, Ordering::SeqCst);
        Self::answer(&self.rendered_pages, url).boxed()
    }
}

/// Listing page in the markup `shop_adapter` understands
#[allow(dead_code)]
pub fn listing_page(items: &[(&str, &str)]) -> String {
    let cards: String = items
        .iter()
        .map(|(name, price)| {
            format!(
                r#"<div class="card"><h2 class="name">{name}</h2><span class="price">{price}</span><img class="photo" data-src="/img/{}.jpg"></div>"#,
                name.replace(' ', "-").to_lowercase()
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head><title>Resultados</title></head>
<body><div class="results">{cards}</div></body>
</html>"#
    )
}

/// Selector adapter for `https://{host}` reading `listing_page` markup
#[allow(dead_code)]
pub fn shop_adapter(name: &str, host: &str, fallback: Fallback) -> Arc<dyn SourceAdapter> {
    let descriptor = SourceDescriptor::new(
        name,
        format!("https://{host}"),
        "/buscar?q=",
        fallback,
        ListingLink::ByName,
    )
    .expect("valid test descriptor");
    Arc::new(
        SelectorAdapter::new(
            descriptor,
            &ListingSelectors::zipped("h2.name", "span.price", "img.photo"),
        )
        .expect("valid test selectors"),
    )
}

/// Rendered fallback waiting on the listing name
#[allow(dead_code)]
pub fn rendered_fallback() -> Fallback {
    Fallback::Rendered {
        ready_selector: "h2.name".to_string(),
        timeout: Duration::from_secs(15),
    }
}

/// Configuration with small, explicit budgets for tests
#[allow(dead_code)]
pub fn test_config() -> ScrapeConfig {
    ScrapeConfig::builder()
        .worker_count(4)
        .adapter_deadline_secs(12)
        .cache_ttl_secs(300)
        .build()
        .expect("valid test config")
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.url(), path)).expect("valid mock URL")
}
