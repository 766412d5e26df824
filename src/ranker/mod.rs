//! Relevance filter and price ordering for merged results

use crate::product::Product;

/// Keep products whose name contains `query`, cheapest first
///
/// Matching is a case-insensitive substring test; accents are significant.
/// Products with an empty name never match. Ties on price are broken by the
/// lower-cased name, and products equal on both keep their input order.
#[must_use]
pub fn rank(products: Vec<Product>, query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();

    let mut kept: Vec<(String, Product)> = products
        .into_iter()
        .filter_map(|product| {
            let folded = product.name().to_lowercase();
            (!folded.is_empty() && folded.contains(&needle)).then_some((folded, product))
        })
        .collect();

    kept.sort_by(|(a_name, a), (b_name, b)| {
        a.price()
            .cmp(&b.price())
            .then_with(|| a_name.cmp(b_name))
    });

    kept.into_iter().map(|(_, product)| product).collect()
}
