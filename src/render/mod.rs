//! Headless-browser render fallback
//!
//! Used when the static transport yields a page whose content is built by
//! JavaScript. Each call owns one browser process from launch to teardown.

mod browser;
mod fetcher;

pub use browser::{
    BrowserInstall, BrowserSession, download_managed_browser, find_browser_executable,
    resolve_browser_executable,
};
pub use fetcher::ChromeRenderer;
