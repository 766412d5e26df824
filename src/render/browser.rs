//! Browser discovery and lifecycle for the render fallback
//!
//! Finds or downloads Chromium, launches it with the fixed fallback flags and
//! guarantees the process and its profile directory are released.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::future::{BoxFuture, Shared};
use futures::{FutureExt, StreamExt};
use once_cell::sync::OnceCell;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;

/// Find a Chrome/Chromium executable
///
/// `CHROMIUM_PATH` wins when it points at an existing file, then the usual
/// install locations for the platform, then `which` on Unix.
///
/// # Errors
///
/// Returns an error when no executable is found.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH points to non-existent file: {}",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    if let Some(path) = candidates.iter().map(PathBuf::from).find(|p| p.exists()) {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser using 'which': {found}");
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache directory
///
/// # Errors
///
/// Returns an error if the cache directory cannot be created or the
/// download fails.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("kodegen_pricescrape")
        .join("chromium");

    info!("Downloading managed Chromium into {}", cache_dir.display());
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

/// An installed browser if there is one, otherwise a managed download
///
/// # Errors
///
/// Returns an error when nothing is installed and the download fails.
pub async fn resolve_browser_executable() -> Result<PathBuf> {
    match find_browser_executable().await {
        Ok(path) => Ok(path),
        Err(e) => {
            info!("{e}, falling back to a managed download");
            download_managed_browser().await
        }
    }
}

type Resolution = Shared<BoxFuture<'static, Result<PathBuf, String>>>;

/// Browser executable, resolved at most once and shared by clones
///
/// Resolution runs on its own task. A render cancelled at its deadline
/// leaves a download in progress for the next render instead of restarting
/// it. The outcome, failure included, is kept for the life of the value.
#[derive(Clone, Default)]
pub struct BrowserInstall {
    resolution: Arc<OnceCell<Resolution>>,
}

impl BrowserInstall {
    /// Path of the browser to launch, resolving it on first use
    ///
    /// # Errors
    ///
    /// The resolution failure, rendered as text; the same on every call.
    pub async fn executable(&self) -> Result<PathBuf, String> {
        self.executable_with(resolve_browser_executable).await
    }

    async fn executable_with<F, Fut>(&self, resolve: F) -> Result<PathBuf, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PathBuf>> + Send + 'static,
    {
        let resolution = self.resolution.get_or_init(|| {
            let task = task::spawn(resolve());
            async move {
                match task.await {
                    Ok(Ok(path)) => Ok(path),
                    Ok(Err(e)) => Err(format!("{e:#}")),
                    Err(e) => Err(format!("browser setup task failed: {e}")),
                }
            }
            .boxed()
            .shared()
        });
        resolution.clone().await
    }
}

impl fmt::Debug for BrowserInstall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserInstall")
            .field("started", &self.resolution.get().is_some())
            .finish()
    }
}

/// One launched browser process with its event handler and profile directory
///
/// Call [`BrowserSession::close`] on every exit path. If the session is
/// dropped instead (for example because the fetch future was cancelled at
/// its deadline), `Drop` aborts the handler, which lets chromiumoxide kill
/// the child process, and removes the profile directory.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    profile_dir: Option<PathBuf>,
}

impl BrowserSession {
    /// Launch `executable` with the render fallback flags from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the profile directory cannot be created or
    /// Chromium fails to start.
    pub async fn launch(config: &ScrapeConfig, executable: PathBuf) -> Result<Self> {
        // Unique profile per launch: concurrent fallbacks must not share a lock
        let profile_dir =
            std::env::temp_dir().join(format!("pricescrape_chrome_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&profile_dir)
            .context("Failed to create browser profile directory")?;

        let (width, height) = config.render_window();
        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(config.render_timeout())
            .window_size(width, height)
            .user_data_dir(profile_dir.clone())
            .chrome_executable(executable)
            .no_sandbox()
            .arg(format!("--user-agent={}", config.user_agent()))
            .arg(format!("--lang={}", config.render_locale()))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--mute-audio");
        builder = if config.headless() {
            builder.headless_mode(HeadlessMode::New)
        } else {
            builder.with_head()
        };
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        let (browser, mut handler) = match Browser::launch(browser_config).await {
            Ok(launched) => launched,
            Err(e) => {
                let _ = std::fs::remove_dir_all(&profile_dir);
                return Err(e).context("Failed to launch browser");
            }
        };

        let handler = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e:?}");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            profile_dir: Some(profile_dir),
        })
    }

    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser, wait for the process to exit and remove the profile
    ///
    /// Best effort: failures are logged, never returned, so callers can run
    /// this unconditionally after both success and failure.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            log::warn!(target: "pricescrape::render", "Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            log::warn!(target: "pricescrape::render", "Failed to wait for browser exit: {e}");
        }
        self.remove_profile_dir();
    }

    fn remove_profile_dir(&mut self) {
        if let Some(path) = self.profile_dir.take()
            && let Err(e) = std::fs::remove_dir_all(&path)
        {
            log::warn!(
                target: "pricescrape::render",
                "Failed to remove browser profile {}: {e}",
                path.display()
            );
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.profile_dir.is_some() {
            log::debug!(
                target: "pricescrape::render",
                "BrowserSession dropped without close(), cleaning up in Drop"
            );
            self.remove_profile_dir();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn slow_resolver(
        starts: Arc<AtomicUsize>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<PathBuf>> {
        move || {
            starts.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(PathBuf::from("/opt/chromium/chrome"))
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_render_does_not_restart_resolution() {
        let install = BrowserInstall::default();
        let starts = Arc::new(AtomicUsize::new(0));

        let first = tokio::time::timeout(
            Duration::from_secs(12),
            install.executable_with(slow_resolver(Arc::clone(&starts))),
        )
        .await;
        assert!(first.is_err());

        let shared = install.clone();
        let second = shared
            .executable_with(slow_resolver(Arc::clone(&starts)))
            .await;

        assert_eq!(second.unwrap(), PathBuf::from("/opt/chromium/chrome"));
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_resolution_is_remembered() {
        let install = BrowserInstall::default();
        let starts = Arc::new(AtomicUsize::new(0));
        let failing = |starts: Arc<AtomicUsize>| {
            move || {
                starts.fetch_add(1, Ordering::SeqCst);
                async { Err::<PathBuf, _>(anyhow::anyhow!("Chrome/Chromium executable not found")) }
                    .boxed()
            }
        };

        let first = install.executable_with(failing(Arc::clone(&starts))).await;
        let second = install.executable_with(failing(Arc::clone(&starts))).await;

        assert!(first.unwrap_err().contains("not found"));
        assert!(second.is_err());
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }
}
