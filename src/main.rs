// Command-line front end: one search, printed as JSON.
//
// Usage: kodegen-pricescrape <query...>
// RUST_LOG controls verbosity (default info); PRICESCRAPE_TRUST_BUNDLE
// overrides the PEM bundle used for the trust-override retailer.

use anyhow::{Context, Result, bail};
use kodegen_tools_pricescrape::{PriceSearch, ScrapeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        bail!("usage: kodegen-pricescrape <query...>");
    }

    let mut builder = ScrapeConfig::builder();
    if let Ok(bundle) = std::env::var("PRICESCRAPE_TRUST_BUNDLE") {
        builder = builder.trust_bundle_path(bundle);
    }
    let config = builder.build().context("Invalid configuration")?;

    let engine = PriceSearch::new(config).context("Failed to start search engine")?;
    let response = engine.respond(&query).await;
    engine.shutdown();

    let json = serde_json::to_string_pretty(&response).context("Failed to encode response")?;
    println!("{json}");
    Ok(())
}
