//! Two-stage fetch: static first, then the adapter's fallback

use tracing::{debug, info, warn};

use super::SourceAdapter;
use super::descriptor::Fallback;
use super::errors::AdapterError;
use super::page_source::PageSource;
use crate::product::{Product, SearchQuery};

/// Fetch and extract one source's listings for `query`
///
/// | static fetch            | fallback     | action                         |
/// |-------------------------|--------------|--------------------------------|
/// | ok, ready selector hit  | any          | extract the static page        |
/// | ok, ready selector miss | `Rendered`   | render, then extract           |
/// | TLS failure             | `Rendered`   | render, then extract           |
/// | TLS failure             | `TrustedTls` | retry via isolated trust store |
/// | any other failure       | any          | error                          |
///
/// # Errors
///
/// Returns the error of the last stage attempted.
pub async fn fetch_products(
    adapter: &dyn SourceAdapter,
    pages: &dyn PageSource,
    query: &SearchQuery,
) -> Result<Vec<Product>, AdapterError> {
    let url = adapter.search_url(query)?;
    let name = adapter.name();

    let page = match (pages.fetch_static(&url).await, adapter.fallback()) {
        (
            Ok(page),
            Fallback::Rendered {
                ready_selector,
                timeout,
            },
        ) if adapter.needs_rendering(&page) => {
            info!("{name}: static page lacks '{ready_selector}', rendering");
            pages.fetch_rendered(&url, ready_selector, *timeout).await?
        }
        (Ok(page), _) => page,
        (
            Err(e),
            Fallback::Rendered {
                ready_selector,
                timeout,
            },
        ) if e.is_tls() => {
            warn!("{name}: {e}, rendering instead");
            pages.fetch_rendered(&url, ready_selector, *timeout).await?
        }
        (Err(e), Fallback::TrustedTls) if e.is_tls() => {
            warn!("{name}: {e}, retrying with trust override");
            pages.fetch_trusted(&url).await?
        }
        (Err(e), _) => return Err(e.into()),
    };

    let products = adapter.extract(&page, query);
    debug!("{name}: {} product(s) from {}", products.len(), page.url());
    Ok(products)
}
