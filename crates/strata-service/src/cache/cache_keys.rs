//! Cache key generators for consistent key naming.
//!
//! Keys are pure functions of the identifier. A remote store may prepend its
//! own instance prefix on top of these.

use strata_core::ProductId;

/// Key holding the full product listing.
pub const ALL_PRODUCTS: &str = "all_products";

/// Generate a cache key for a product by ID.
#[must_use]
pub fn product(id: ProductId) -> String {
    format!("product_{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key() {
        assert_eq!(product(ProductId::new(42)), "product_42");
        assert_eq!(product(ProductId::new(-1)), "product_-1");
    }

    #[test]
    fn test_collection_key_differs_from_product_keys() {
        assert_ne!(product(ProductId::new(0)), ALL_PRODUCTS);
    }
}
