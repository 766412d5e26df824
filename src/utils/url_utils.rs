//! URL helpers shared by adapters and the transport.

use url::Url;

/// Host component of `url`, or an empty string for host-less URLs
#[must_use]
pub fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Resolve `raw` against `base`, returning it only if the result is http(s)
///
/// Mirrors how a browser resolves `src`-like attributes: relative paths,
/// protocol-relative `//host/..` and absolute URLs are all accepted.
#[must_use]
pub fn absolutize(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let joined = base.join(raw).ok()?;
    is_valid_url(joined.as_str()).then(|| joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_resolves_relative_and_protocol_relative() {
        let base = Url::parse("https://shop.example.com/buscar?q=leche").unwrap();
        assert_eq!(
            absolutize(&base, "/img/a.jpg").as_deref(),
            Some("https://shop.example.com/img/a.jpg")
        );
        assert_eq!(
            absolutize(&base, "//cdn.example.com/b.png").as_deref(),
            Some("https://cdn.example.com/b.png")
        );
        assert_eq!(absolutize(&base, "   "), None);
        assert_eq!(absolutize(&base, "data:image/png;base64,AAAA"), None);
    }

    #[test]
    fn host_of_strips_scheme_and_path() {
        let url = Url::parse("https://www.stock.com.py/search.aspx?searchterms=x").unwrap();
        assert_eq!(host_of(&url), "www.stock.com.py");
    }
}
