//! The built-in retailer catalogue

use std::sync::Arc;

use super::SourceAdapter;
use super::descriptor::{Fallback, ListingLink, SourceDescriptor};
use super::embedded_json::EmbeddedJsonAdapter;
use super::errors::AdapterError;
use super::selector::{ListingSelectors, SelectorAdapter};
use crate::config::ScrapeConfig;

/// All supported retailers, in registry order
///
/// Registry order is the merge order of results before ranking, so it also
/// decides the order of equal-priced, equal-named listings.
///
/// # Errors
///
/// `AdapterError` if a catalogue entry has a malformed URL or selector.
pub fn default_sources(config: &ScrapeConfig) -> Result<Vec<Arc<dyn SourceAdapter>>, AdapterError> {
    let rendered = |ready_selector: &str| Fallback::Rendered {
        ready_selector: ready_selector.to_string(),
        timeout: config.render_timeout(),
    };

    let selector_source = |name: &str,
                           base: &str,
                           path: &str,
                           fallback: Fallback,
                           link: ListingLink,
                           selectors: ListingSelectors|
     -> Result<Arc<dyn SourceAdapter>, AdapterError> {
        let descriptor = SourceDescriptor::new(name, base, path, fallback, link)?;
        Ok(Arc::new(SelectorAdapter::new(descriptor, &selectors)?))
    };

    Ok(vec![
        selector_source(
            "farmatotal",
            "https://www.farmatotal.com.py",
            "/?s=",
            rendered("div.content-wrapper > h3 > a"),
            ListingLink::ByName,
            ListingSelectors::zipped(
                "div.content-wrapper > h3 > a",
                "span.woocommerce-Price-amount.amount > bdi > span",
                "div.thumbnail-wrapper > a > img",
            ),
        )?,
        selector_source(
            "puntofarma",
            "https://www.puntofarma.com.py",
            "/buscar?s=",
            Fallback::None,
            ListingLink::ByName,
            ListingSelectors::zipped(
                "a.text-decoration-none > h2",
                "div.precios-producto > div > span",
                ".align-items-center.mx-auto.card-producto_imagen__EgbD0 > img",
            ),
        )?,
        selector_source(
            "farmacenter",
            "https://www.farmacenter.com.py",
            "/catalogo?q=",
            Fallback::TrustedTls,
            ListingLink::ByName,
            ListingSelectors::zipped(
                "h2.ecommercepro-loop-product__title",
                "span.price > span",
                "img.wp-post-image",
            ),
        )?,
        selector_source(
            "supermas",
            "https://www.supermas.com.py",
            "/productos?q=",
            Fallback::None,
            ListingLink::ByQuery,
            ListingSelectors::zipped(
                "h2.woocommerce-loop-product__title",
                "span.price > span.amount",
                "div.product-list-image > img",
            ),
        )?,
        selector_source(
            "casarica",
            "https://www.casarica.com.py",
            "/productos?q=",
            Fallback::None,
            ListingLink::ByName,
            ListingSelectors::zipped(
                "h2.ecommercepro-loop-product__title",
                "span.amount",
                "div.product-list-image > img",
            ),
        )?,
        selector_source(
            "salemma",
            "https://www.salemmaonline.com.py",
            "/buscar?q=",
            Fallback::None,
            ListingLink::ByName,
            ListingSelectors::zipped("a.apsubtitle", "h6[class=pprice]", "img.imgprodts"),
        )?,
        Arc::new(EmbeddedJsonAdapter::new(SourceDescriptor::new(
            "real",
            "https://www.realonline.com.py",
            "/search?name=",
            Fallback::None,
            ListingLink::ByQuery,
        )?)) as Arc<dyn SourceAdapter>,
        selector_source(
            "stock",
            "https://www.stock.com.py",
            "/search.aspx?searchterms=",
            Fallback::None,
            ListingLink::ByQuery,
            ListingSelectors::zipped("h2.product-title", "span.price-label", "a.picture-link > img"),
        )?,
        selector_source(
            "catedral",
            "https://farmaciacatedral.com.py",
            "/buscador?q=",
            rendered("div.card-producto-texto h2 a"),
            ListingLink::ByName,
            ListingSelectors::zipped(
                "div.card-producto-texto > h2 > a",
                "div > div.card-producto-texto > h3",
                "div > a > img",
            ),
        )?,
        selector_source(
            "biggie",
            "https://biggie.com.py",
            "/search?q=",
            rendered("div.v-card__title.titleCard.pt-1"),
            ListingLink::ByName,
            ListingSelectors::zipped(
                "div.v-card__title.titleCard.pt-1",
                "div.v-card__text.title.font-weight-medium.pa-0.d-flex.justify-center > span",
                "div.v-image__image.v-image__image--contain",
            ),
        )?,
    ])
}
