//! CSS-selector driven adapter

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::SourceAdapter;
use super::descriptor::{Fallback, SourceDescriptor};
use super::errors::AdapterError;
use super::extract::{compile_selector, element_text, parse_price, resolve_image};
use crate::product::{Product, SearchQuery};
use crate::transport::Document;
use crate::utils::MISSING_NAME;

/// Selector set for one listing page
///
/// Without `item`, name/price/image are selected across the whole page and
/// zipped by position. With `item`, each matching container yields exactly
/// one product and the three selectors are evaluated inside it, so a missing
/// element only affects its own listing.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub item: Option<String>,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl ListingSelectors {
    #[must_use]
    pub fn zipped(name: &str, price: &str, image: &str) -> Self {
        Self {
            item: None,
            name: name.to_string(),
            price: price.to_string(),
            image: image.to_string(),
        }
    }

    #[must_use]
    pub fn scoped(item: &str, name: &str, price: &str, image: &str) -> Self {
        Self {
            item: Some(item.to_string()),
            ..Self::zipped(name, price, image)
        }
    }
}

struct CompiledSelectors {
    item: Option<Selector>,
    name: Selector,
    price: Selector,
    image: Selector,
}

/// Adapter for retailers whose listings are plain server-rendered markup
pub struct SelectorAdapter {
    descriptor: SourceDescriptor,
    selectors: CompiledSelectors,
    ready: Option<Selector>,
}

impl SelectorAdapter {
    /// Compile the selectors for `descriptor`
    ///
    /// # Errors
    ///
    /// `AdapterError::Selector` if any selector, including the rendered
    /// fallback's ready selector, fails to parse.
    pub fn new(
        descriptor: SourceDescriptor,
        selectors: &ListingSelectors,
    ) -> Result<Self, AdapterError> {
        let compiled = CompiledSelectors {
            item: selectors.item.as_deref().map(compile_selector).transpose()?,
            name: compile_selector(&selectors.name)?,
            price: compile_selector(&selectors.price)?,
            image: compile_selector(&selectors.image)?,
        };

        let ready = match descriptor.fallback() {
            Fallback::Rendered { ready_selector, .. } => Some(compile_selector(ready_selector)?),
            Fallback::None | Fallback::TrustedTls => None,
        };

        Ok(Self {
            descriptor,
            selectors: compiled,
            ready,
        })
    }

    fn extract_zipped(&self, html: &Html, base: &Url, query: &SearchQuery) -> Vec<Product> {
        let names: Vec<ElementRef<'_>> = html.select(&self.selectors.name).collect();
        let prices: Vec<ElementRef<'_>> = html.select(&self.selectors.price).collect();
        let images: Vec<ElementRef<'_>> = html.select(&self.selectors.image).collect();

        if names.len() != prices.len() || names.len() != images.len() {
            warn!(
                "{}: misaligned listing ({} names, {} prices, {} images), keeping the first {}",
                self.name(),
                names.len(),
                prices.len(),
                images.len(),
                names.len().min(prices.len()).min(images.len())
            );
        }

        names
            .into_iter()
            .zip(prices)
            .zip(images)
            .map(|((name, price), image)| {
                self.listing(Some(name), Some(price), Some(image), base, query)
            })
            .collect()
    }

    fn extract_scoped(
        &self,
        html: &Html,
        item: &Selector,
        base: &Url,
        query: &SearchQuery,
    ) -> Vec<Product> {
        html.select(item)
            .map(|container| {
                self.listing(
                    container.select(&self.selectors.name).next(),
                    container.select(&self.selectors.price).next(),
                    container.select(&self.selectors.image).next(),
                    base,
                    query,
                )
            })
            .collect()
    }

    fn listing(
        &self,
        name: Option<ElementRef<'_>>,
        price: Option<ElementRef<'_>>,
        image: Option<ElementRef<'_>>,
        base: &Url,
        query: &SearchQuery,
    ) -> Product {
        let name = name
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| MISSING_NAME.to_string());
        let price = price.map_or(0, |el| parse_price(&element_text(&el)));
        let image = image.map(|el| resolve_image(&el, base)).unwrap_or_default();
        let source_url = self.descriptor.listing_url(&name, query);

        Product::new(
            name,
            price,
            image,
            self.descriptor.origin_host(),
            source_url,
        )
    }
}

impl SourceAdapter for SelectorAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn needs_rendering(&self, page: &Document) -> bool {
        self.ready
            .as_ref()
            .is_some_and(|ready| !page.has_match(ready))
    }

    fn extract(&self, page: &Document, query: &SearchQuery) -> Vec<Product> {
        let html = page.parse();
        let products = match &self.selectors.item {
            Some(item) => self.extract_scoped(&html, item, page.url(), query),
            None => self.extract_zipped(&html, page.url(), query),
        };
        debug!("{}: extracted {} listing(s)", self.name(), products.len());
        products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ListingLink;
    use std::time::Duration;

    fn adapter(selectors: &ListingSelectors, fallback: Fallback) -> SelectorAdapter {
        let descriptor = SourceDescriptor::new(
            "shop",
            "https://shop.example.com",
            "/buscar?q=",
            fallback,
            ListingLink::ByName,
        )
        .unwrap();
        SelectorAdapter::new(descriptor, selectors).unwrap()
    }

    fn page(html: &str) -> Document {
        Document::new(
            Url::parse("https://shop.example.com/buscar?q=leche").unwrap(),
            html,
        )
    }

    #[test]
    fn zipped_extraction_truncates_to_shortest_list() {
        let adapter = adapter(
            &ListingSelectors::zipped("h2.name", "span.price", "img.photo"),
            Fallback::None,
        );
        let html = r#"
            <h2 class="name">Leche Entera</h2><span class="price">12.000 Gs</span><img class="photo" src="/a.jpg">
            <h2 class="name">Leche Light</h2><span class="price">8.000 Gs</span><img class="photo" data-src="/b.jpg">
            <h2 class="name">Leche Sin Precio</h2>
        "#;
        let query = SearchQuery::parse("leche").unwrap();
        let products = adapter.extract(&page(html), &query);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name(), "Leche Entera");
        assert_eq!(products[0].price(), 12_000);
        assert_eq!(products[0].image_url(), "https://shop.example.com/a.jpg");
        assert_eq!(products[0].origin_host(), "shop.example.com");
        assert_eq!(
            products[0].source_url(),
            "https://shop.example.com/buscar?q=Leche%20Entera"
        );
        assert_eq!(products[1].image_url(), "https://shop.example.com/b.jpg");
    }

    #[test]
    fn scoped_extraction_keeps_items_aligned() {
        let adapter = adapter(
            &ListingSelectors::scoped("div.card", "h2", "span.price", "img"),
            Fallback::None,
        );
        let html = r#"
            <div class="card"><h2>Leche Entera</h2><img src="/a.jpg"></div>
            <div class="card"><h2>  </h2><span class="price">8.000</span><img src="/b.jpg"></div>
            <div class="card"><h2>Leche Light</h2><span class="price">9.500 Gs</span></div>
        "#;
        let query = SearchQuery::parse("leche").unwrap();
        let products = adapter.extract(&page(html), &query);

        assert_eq!(products.len(), 3);
        assert_eq!((products[0].name(), products[0].price()), ("Leche Entera", 0));
        assert_eq!((products[1].name(), products[1].price()), ("NN", 8_000));
        assert_eq!(products[1].image_url(), "https://shop.example.com/b.jpg");
        assert_eq!((products[2].name(), products[2].price()), ("Leche Light", 9_500));
        assert_eq!(products[2].image_url(), "");
    }

    #[test]
    fn needs_rendering_only_with_rendered_fallback() {
        let selectors = ListingSelectors::zipped("h2", "span", "img");
        let rendered = adapter(
            &selectors,
            Fallback::Rendered {
                ready_selector: "div.content-wrapper > h3 > a".to_string(),
                timeout: Duration::from_secs(15),
            },
        );
        let static_only = adapter(&selectors, Fallback::None);
        let shell = page("<div id=app></div>");
        let full = page(r#"<div class="content-wrapper"><h3><a>Leche</a></h3></div>"#);

        assert!(rendered.needs_rendering(&shell));
        assert!(!rendered.needs_rendering(&full));
        assert!(!static_only.needs_rendering(&shell));
    }

    #[test]
    fn invalid_selector_is_reported() {
        let descriptor = SourceDescriptor::new(
            "shop",
            "https://shop.example.com",
            "/?q=",
            Fallback::None,
            ListingLink::ByQuery,
        )
        .unwrap();
        let err = SelectorAdapter::new(descriptor, &ListingSelectors::zipped("h2[", "p", "img"))
            .err()
            .unwrap();
        assert!(matches!(err, AdapterError::Selector { .. }));
    }
}
