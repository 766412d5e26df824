//! Static-then-fallback fetch decisions, driven by a fake page source

use kodegen_tools_pricescrape::{AdapterError, Fallback, SearchQuery, fetch_products};

mod common;
use common::{FakePageSource, Reply, listing_page, rendered_fallback, shop_adapter};

const HOST: &str = "shop.example.com";

fn leche() -> SearchQuery {
    SearchQuery::parse("leche").unwrap()
}

#[tokio::test]
async fn static_page_with_content_is_used_directly() {
    let adapter = shop_adapter("shop", HOST, rendered_fallback());
    let pages = FakePageSource::new().on_static(
        HOST,
        Reply::Html(listing_page(&[("Leche Entera", "12.000 Gs")])),
    );

    let products = fetch_products(adapter.as_ref(), &pages, &leche()).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price(), 12_000);
    assert_eq!(products[0].currency_label(), "GS");
    assert_eq!(pages.calls(), (1, 0, 0));
}

#[tokio::test]
async fn javascript_shell_triggers_rendering() {
    let adapter = shop_adapter("shop", HOST, rendered_fallback());
    let pages = FakePageSource::new()
        .on_static(HOST, Reply::Html("<div id=\"app\"></div>".to_string()))
        .on_rendered(
            HOST,
            Reply::Html(listing_page(&[("Leche Light", "8.000 Gs")])),
        );

    let products = fetch_products(adapter.as_ref(), &pages, &leche()).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name(), "Leche Light");
    assert_eq!(pages.calls(), (1, 0, 1));
}

#[tokio::test]
async fn empty_page_without_fallback_is_an_empty_result() {
    let adapter = shop_adapter("shop", HOST, Fallback::None);
    let pages =
        FakePageSource::new().on_static(HOST, Reply::Html("<div id=\"app\"></div>".to_string()));

    let products = fetch_products(adapter.as_ref(), &pages, &leche()).await.unwrap();

    assert!(products.is_empty());
    assert_eq!(pages.calls(), (1, 0, 0));
}

#[tokio::test]
async fn tls_failure_renders_when_rendering_is_the_fallback() {
    let adapter = shop_adapter("shop", HOST, rendered_fallback());
    let pages = FakePageSource::new()
        .on_static(HOST, Reply::Tls)
        .on_rendered(
            HOST,
            Reply::Html(listing_page(&[("Leche Entera", "12.000")])),
        );

    let products = fetch_products(adapter.as_ref(), &pages, &leche()).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(pages.calls(), (1, 0, 1));
}

#[tokio::test]
async fn tls_failure_retries_with_trust_override() {
    let adapter = shop_adapter("farmacenter", HOST, Fallback::TrustedTls);
    let pages = FakePageSource::new()
        .on_static(HOST, Reply::Tls)
        .on_trusted(
            HOST,
            Reply::Html(listing_page(&[("Leche en Polvo", "45.500 Gs")])),
        );

    let products = fetch_products(adapter.as_ref(), &pages, &leche()).await.unwrap();

    assert_eq!(products[0].price(), 45_500);
    assert_eq!(pages.calls(), (1, 1, 0));
}

#[tokio::test]
async fn tls_failure_without_fallback_is_an_error() {
    let adapter = shop_adapter("shop", HOST, Fallback::None);
    let pages = FakePageSource::new().on_static(HOST, Reply::Tls);

    let err = fetch_products(adapter.as_ref(), &pages, &leche())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Fetch(ref e) if e.is_tls()));
    assert_eq!(pages.calls(), (1, 0, 0));
}

#[tokio::test]
async fn non_tls_failures_skip_the_fallback() {
    let adapter = shop_adapter("shop", HOST, rendered_fallback());
    let pages = FakePageSource::new().on_static(HOST, Reply::Status(503));

    let err = fetch_products(adapter.as_ref(), &pages, &leche())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("503"));
    assert_eq!(pages.calls(), (1, 0, 0));
}

#[tokio::test]
async fn render_timeout_is_a_hard_failure() {
    let adapter = shop_adapter("shop", HOST, rendered_fallback());
    let pages = FakePageSource::new()
        .on_static(HOST, Reply::Html(String::new()))
        .on_rendered(HOST, Reply::RenderTimeout);

    let err = fetch_products(adapter.as_ref(), &pages, &leche())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(pages.calls(), (1, 0, 1));
}
