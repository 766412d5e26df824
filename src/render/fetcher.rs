//! Rendered page fetch: launch, navigate, wait for a selector, capture, tear down

use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use super::browser::{BrowserInstall, BrowserSession};
use crate::config::ScrapeConfig;
use crate::transport::{Document, FetchError, FetchResult};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Render fallback backed by a fresh Chromium per call
///
/// The executable is resolved once per renderer and shared by its clones.
#[derive(Clone, Debug)]
pub struct ChromeRenderer {
    config: Arc<ScrapeConfig>,
    install: BrowserInstall,
}

impl ChromeRenderer {
    #[must_use]
    pub fn new(config: Arc<ScrapeConfig>) -> Self {
        Self {
            config,
            install: BrowserInstall::default(),
        }
    }

    /// Fetch the fully rendered source of `url`
    ///
    /// Blocks until `wait_for` matches an element or `timeout` elapses; an
    /// empty `wait_for` skips the wait. The browser is torn down before this
    /// returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// `FetchError::Browser` if the browser cannot be launched or navigation
    /// fails, `FetchError::RenderTimeout` if the selector never appears.
    pub async fn fetch_rendered(
        &self,
        url: &Url,
        wait_for: &str,
        timeout: Duration,
    ) -> FetchResult<Document> {
        info!("Rendering {url} (waiting for '{wait_for}', up to {timeout:?})");

        let executable = self.install.executable().await.map_err(FetchError::Browser)?;
        let session = BrowserSession::launch(&self.config, executable)
            .await
            .map_err(|e| FetchError::Browser(format!("{e:#}")))?;

        let outcome = render_page(
            session.browser(),
            url,
            self.config.referrer(),
            wait_for,
            timeout,
        )
        .await;

        session.close().await;
        outcome
    }
}

async fn render_page(
    browser: &Browser,
    url: &Url,
    referrer: &str,
    wait_for: &str,
    timeout: Duration,
) -> FetchResult<Document> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| FetchError::Browser(format!("failed to open page: {e}")))?;

    let mut navigation = NavigateParams::new(url.as_str());
    navigation.referrer = Some(referrer.to_string());
    page.goto(navigation)
        .await
        .map_err(|e| FetchError::Browser(format!("navigation to {url} failed: {e}")))?;

    if !wait_for.is_empty() {
        wait_for_selector(&page, url, wait_for, timeout).await?;
    }

    let html = page
        .content()
        .await
        .map_err(|e| FetchError::Browser(format!("failed to capture page source: {e}")))?;

    let final_url = page
        .url()
        .await
        .ok()
        .flatten()
        .and_then(|current| Url::parse(&current).ok())
        .unwrap_or_else(|| url.clone());

    Ok(Document::new(final_url, html))
}

/// Poll the DOM until `selector` matches, failing hard at `timeout`
async fn wait_for_selector(
    page: &Page,
    url: &Url,
    selector: &str,
    timeout: Duration,
) -> FetchResult<()> {
    let start = Instant::now();
    loop {
        if page.find_element(selector).await.is_ok() {
            debug!("'{selector}' appeared after {:?}", start.elapsed());
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(FetchError::RenderTimeout {
                url: url.to_string(),
                selector: selector.to_string(),
                timeout,
            });
        }
        tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
    }
}
