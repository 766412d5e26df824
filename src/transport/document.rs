//! Fetched page representation shared by the static and rendered paths

use scraper::{Html, Selector};
use url::Url;

/// A fetched page: its final URL and the HTML source
///
/// Stored as text and parsed on demand because `scraper::Html` is not `Send`
/// and documents cross task boundaries in the fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: Url,
    html: String,
}

impl Document {
    #[must_use]
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }

    /// Final URL after redirects; base for resolving relative attributes
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parse the source into a DOM
    #[must_use]
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Whether at least one element matches `selector`
    #[must_use]
    pub fn has_match(&self, selector: &Selector) -> bool {
        self.parse().select(selector).next().is_some()
    }
}
