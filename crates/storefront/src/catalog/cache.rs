//! Cache types for catalog backend responses.

use std::mem::size_of;
use std::sync::Arc;

use shopfront_core::{Product, ProductId};

use super::ProductImage;

/// Byte budget for all cached catalog responses.
pub const CACHE_BYTE_BUDGET: u64 = 64 * 1024 * 1024;

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Image(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Image(ProductImage),
}

impl CacheValue {
    /// Approximate heap size in bytes, used as the cache weight.
    #[must_use]
    pub fn weight(&self) -> u32 {
        let bytes = match self {
            Self::Products(products) => products.iter().map(product_size).sum(),
            Self::Image(image) => image.bytes.len() + image.content_type.len(),
        };
        u32::try_from(bytes).unwrap_or(u32::MAX)
    }
}

fn product_size(product: &Product) -> usize {
    size_of::<Product>()
        + product.name.len()
        + product.brand.len()
        + product.category.len()
        + product.description.len()
        + product.image_name.as_ref().map_or(0, String::len)
        + product.image_type.as_ref().map_or(0, String::len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Bytes;
    use serde_json::json;

    use super::*;

    fn image(len: usize) -> CacheValue {
        CacheValue::Image(ProductImage {
            bytes: Bytes::from(vec![0_u8; len]),
            content_type: "image/png".to_string(),
        })
    }

    #[test]
    fn test_image_weight_tracks_byte_length() {
        assert_eq!(image(0).weight(), 9);
        assert_eq!(image(2 * 1024 * 1024).weight(), 2 * 1024 * 1024 + 9);
    }

    #[test]
    fn test_product_list_weight_grows_with_content() {
        let short: Product = serde_json::from_value(json!({"id": 1, "price": 5})).unwrap();
        let mut long = short.clone();
        long.description = "x".repeat(1000);

        let one = CacheValue::Products(Arc::new(vec![short.clone()])).weight();
        let two = CacheValue::Products(Arc::new(vec![short.clone(), short])).weight();
        let verbose = CacheValue::Products(Arc::new(vec![long])).weight();

        assert!(one > 0);
        assert_eq!(two, one * 2);
        assert_eq!(verbose, one + 1000);
        assert_eq!(CacheValue::Products(Arc::new(Vec::new())).weight(), 0);
    }

    #[tokio::test]
    async fn test_budget_bounds_image_bytes_not_entry_count() {
        let cache: moka::future::Cache<CacheKey, CacheValue> = moka::future::Cache::builder()
            .max_capacity(10 * 1024)
            .weigher(|_key, value: &CacheValue| value.weight())
            .build();

        for id in 0..20 {
            cache.insert(CacheKey::Image(ProductId::new(id)), image(1024)).await;
        }
        cache.run_pending_tasks().await;

        assert!(cache.weighted_size() <= 10 * 1024);
        assert!(cache.entry_count() < 20);
    }
}
