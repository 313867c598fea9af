//! Integration tests for Shopfront.
//!
//! Each test starts the storefront router on an ephemeral port, backed by a
//! `mockito` catalog server and an in-memory session store, and drives it
//! with a cookie-keeping `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::time::Duration;

use mockito::{Mock, ServerGuard};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tower_sessions::MemoryStore;
use url::form_urlencoded;

use shopfront_core::CurrencyCode;
use shopfront_storefront::config::{CatalogConfig, StorefrontConfig};
use shopfront_storefront::middleware::create_session_layer;
use shopfront_storefront::routes;
use shopfront_storefront::state::AppState;

/// A running storefront plus its fake backend.
pub struct TestContext {
    /// Client that keeps the session cookie and follows redirects.
    pub client: reqwest::Client,
    /// Base URL of the storefront, without trailing slash.
    pub base_url: String,
    /// Fake catalog backend; mocks live under `/api`.
    pub backend: ServerGuard,
}

impl TestContext {
    /// Start a storefront with no product editor configured.
    pub async fn new() -> Self {
        Self::with_editor(None).await
    }

    /// Start a storefront, optionally with an external product editor.
    pub async fn with_editor(editor_url: Option<&str>) -> Self {
        let backend = mockito::Server::new_async().await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_string(),
            session_database_url: "sqlite::memory:".to_string(),
            catalog: CatalogConfig::new(&format!("{}/api", backend.url()), Duration::from_secs(60))
                .unwrap(),
            editor_url: editor_url.map(|url| url.parse().unwrap()),
            currency: CurrencyCode::USD,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let app = routes::app(session_layer).with_state(AppState::new(config));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();

        Self {
            client,
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// Build a storefront URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page and return its body.
    pub async fn page(&self, path: &str) -> String {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        assert!(response.status().is_success(), "GET {path} -> {}", response.status());
        response.text().await.unwrap()
    }

    /// POST a form, follow the redirect, and return the landing page body.
    pub async fn submit(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(encode_form(form))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success(), "POST {path} -> {}", response.status());
        response.text().await.unwrap()
    }

    /// Add one unit of a product, returning to the cart page.
    pub async fn add_to_cart(&self, id: i64) -> String {
        self.submit("/cart/add", &[("product_id", &id.to_string()), ("return_to", "/cart")])
            .await
    }

    /// Remove one unit of a product, returning to the cart page.
    pub async fn remove_from_cart(&self, id: i64) -> String {
        self.submit("/cart/remove", &[("product_id", &id.to_string()), ("return_to", "/cart")])
            .await
    }

    /// Serve `products` from `GET /api/products`.
    pub async fn mock_products(&mut self, products: &[Value]) -> Mock {
        self.backend
            .mock("GET", "/api/products")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(products.to_vec()).to_string())
            .create_async()
            .await
    }

    /// Serve `product` from `GET /api/product/{id}`.
    pub async fn mock_product(&mut self, product: &Value) -> Mock {
        let id = product["id"].as_i64().unwrap();
        self.backend
            .mock("GET", format!("/api/product/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(product.to_string())
            .create_async()
            .await
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish()
}

/// Backend JSON for a product.
pub fn product_json(id: i64, name: &str, category: &str, price: u32, stock: i32) -> Value {
    json!({
        "id": id,
        "name": name,
        "brand": "Acme",
        "category": category,
        "price": price,
        "productAvailable": true,
        "stockQuantity": stock,
        "description": format!("{name} description"),
        "releaseDate": "2024-03-15",
        "imageName": format!("{id}.png"),
        "imageType": "image/png"
    })
}
