//! Client for the remote catalog backend.
//!
//! # Endpoints
//!
//! ```text
//! GET    /products            - Product list
//! GET    /product/{id}        - Single product
//! GET    /product/{id}/image  - Product image bytes
//! DELETE /product/{id}        - Delete a product
//! GET    /orders              - Placed orders
//! ```
//!
//! The product list and product images are cached with `moka` for the
//! configured TTL. Single products and orders are always fetched fresh.

mod cache;

use std::sync::Arc;

use axum::body::Bytes;
use moka::future::Cache;
use reqwest::{Response, StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use shopfront_core::{Order, Product, ProductId};

use crate::config::CatalogConfig;
use cache::{CACHE_BYTE_BUDGET, CacheKey, CacheValue};

/// Maximum number of characters of a failed response body kept for logs.
const ERROR_BODY_LIMIT: usize = 500;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not complete.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CatalogError {
    /// Whether this error means the entity is absent rather than unreachable.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Image bytes as served by the backend.
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Client for the catalog backend.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_BYTE_BUDGET)
            .weigher(|_key, value: &CacheValue| value.weight())
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Map non-success statuses to errors, logging the body.
    async fn check(response: Response, what: &str) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(ERROR_BODY_LIMIT)
            .collect();
        tracing::error!(
            status = %status,
            body = %body,
            "Catalog backend returned non-success status"
        );
        Err(CatalogError::Status { status, body })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(self.endpoint(path)?).send().await?;
        let response = Self::check(response, what).await?;

        // Read as text first for better error diagnostics
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(ERROR_BODY_LIMIT).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full product list.
    ///
    /// Served from cache when fresh, so repeated renders do not re-issue the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers badly.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Arc<Vec<Product>> = Arc::new(self.get_json("products", "products").await?);
        debug!(count = products.len(), "Fetched product list");

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Drop the cached product list and fetch it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the refetch fails; the cache stays empty then.
    #[instrument(skip(self))]
    pub async fn refresh_products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        self.inner.cache.invalidate(&CacheKey::Products).await;
        self.products().await
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the backend has no such product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("product/{id}"), &format!("product {id}"))
            .await
    }

    /// Get a product's image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product_image(&self, id: ProductId) -> Result<ProductImage, CatalogError> {
        let key = CacheKey::Image(id);
        if let Some(CacheValue::Image(image)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product image");
            return Ok(image);
        }

        let url = self.endpoint(&format!("product/{id}/image"))?;
        let response = self.inner.client.get(url).send().await?;
        let response = Self::check(response, &format!("image for product {id}")).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;

        let image = ProductImage {
            bytes,
            content_type,
        };
        self.inner
            .cache
            .insert(key, CacheValue::Image(image.clone()))
            .await;

        Ok(image)
    }

    /// Delete a product.
    ///
    /// On success the product's cached image and the cached list are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses or cannot be reached; nothing
    /// is invalidated then.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let url = self.endpoint(&format!("product/{id}"))?;
        let response = self.inner.client.delete(url).send().await?;
        Self::check(response, &format!("product {id}")).await?;

        self.inner.cache.invalidate(&CacheKey::Image(id)).await;
        self.inner.cache.invalidate(&CacheKey::Products).await;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Get all placed orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers badly.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, CatalogError> {
        self.get_json("orders", "orders").await
    }
}
