//! Adapter for listings shipped as JSON inside `<script>` tags

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::debug;

use super::SourceAdapter;
use super::descriptor::SourceDescriptor;
use crate::product::{Product, SearchQuery};
use crate::transport::Document;
use crate::utils::absolutize;

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("SCRIPT: hardcoded selector is valid"));

/// `{"product": {"name": "...", "price": 123, "photosUrl": ["..."`
static PRODUCT_TRIPLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)\{\s*"product"\s*:\s*\{\s*"name"\s*:\s*"([^"]+)"\s*,\s*"price"\s*:\s*(\d+)\s*,\s*"photosUrl"\s*:\s*\[\s*"([^"]+)""#,
    )
    .expect("PRODUCT_TRIPLET: hardcoded regex is valid")
});

/// Undo the escaping applied when JSON is embedded in a script string
///
/// Replacements run in a fixed order: `\u0022`, `\x22`, `\/`, then `\"`.
#[must_use]
pub fn normalize_script_escapes(raw: &str) -> String {
    raw.replace("\\u0022", "\"")
        .replace("\\x22", "\"")
        .replace("\\/", "/")
        .replace("\\\"", "\"")
}

/// Scans every script body for name/price/photo triplets
pub struct EmbeddedJsonAdapter {
    descriptor: SourceDescriptor,
}

impl EmbeddedJsonAdapter {
    #[must_use]
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }
}

impl SourceAdapter for EmbeddedJsonAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn needs_rendering(&self, _page: &Document) -> bool {
        false
    }

    fn extract(&self, page: &Document, query: &SearchQuery) -> Vec<Product> {
        let html = page.parse();
        let origin = self.descriptor.origin_host();
        let mut products = Vec::new();

        for script in html.select(&SCRIPT) {
            let body: String = script.text().collect();
            if body.trim().is_empty() {
                continue;
            }

            let normalized = normalize_script_escapes(&body);
            for caps in PRODUCT_TRIPLET.captures_iter(&normalized) {
                let name = caps[1].trim();
                let price = caps[2].parse().unwrap_or(0);
                let photo = &caps[3];
                let image = absolutize(page.url(), photo).unwrap_or_else(|| photo.to_string());

                products.push(Product::new(
                    name,
                    price,
                    image,
                    origin.clone(),
                    self.descriptor.listing_url(name, query),
                ));
            }
        }

        debug!("{}: found {} embedded listing(s)", self.name(), products.len());
        products
    }
}
