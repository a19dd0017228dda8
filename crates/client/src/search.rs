//! Substring search over the product list.

use itx_store_core::Product;

/// Filter products whose brand or model contains `query`,
/// case-insensitively. A blank query matches everything; result order
/// follows the input.
#[must_use]
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|product| {
            product.brand.to_lowercase().contains(&needle)
                || product.model.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
