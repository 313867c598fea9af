//! Integration tests for the product detail page, image proxy, and delete.

#![allow(clippy::unwrap_used)]

use reqwest::{StatusCode, header::CONTENT_TYPE, header::LOCATION, redirect::Policy};
use shopfront_integration_tests::{TestContext, product_json};

// =============================================================================
// Detail Page
// =============================================================================

#[tokio::test]
async fn test_shell_shows_loading_state() {
    let mut ctx = TestContext::new().await;
    let _list = ctx.mock_products(&[]).await;

    let page = ctx.page("/product/1").await;

    assert!(page.contains(r#"hx-get="/product/1/panel""#));
    assert!(page.contains("Loading..."));
}

#[tokio::test]
async fn test_panel_renders_product() {
    let mut ctx = TestContext::new().await;
    let _product = ctx
        .mock_product(&product_json(1, "Widget", "tools", 10, 5))
        .await;

    let panel = ctx.page("/product/1/panel").await;

    assert!(panel.contains("<h1>Widget</h1>"));
    assert!(panel.contains("Listed : <i>3/15/2024</i>"));
    assert!(panel.contains("PRODUCT DESCRIPTION"));
    assert!(panel.contains("$10.00"));
    assert!(panel.contains(r#"src="/product/1/image""#));
    assert!(panel.contains(r#"class="in-stock">5</i>"#));
    assert!(panel.contains("Add to Cart"));
    assert!(!panel.contains("Loading..."));
}

#[tokio::test]
async fn test_panel_reflects_cart_quantity() {
    let mut ctx = TestContext::new().await;
    let product = product_json(1, "Widget", "tools", 10, 5);
    let _list = ctx.mock_products(&[product.clone()]).await;
    let _product = ctx.mock_product(&product).await;

    ctx.add_to_cart(1).await;
    let panel = ctx.page("/product/1/panel").await;

    assert!(panel.contains(r#"<span class="quantity">1</span>"#));
    assert!(!panel.contains("Add to Cart"));
}

#[tokio::test]
async fn test_panel_not_found() {
    let mut ctx = TestContext::new().await;
    let _missing = ctx
        .backend
        .mock("GET", "/api/product/404")
        .with_status(404)
        .create_async()
        .await;

    let panel = ctx.page("/product/404/panel").await;

    assert!(panel.contains("Product not found"));
}

#[tokio::test]
async fn test_panel_backend_failure() {
    let ctx = TestContext::new().await;

    let panel = ctx.page("/product/1/panel").await;

    assert!(panel.contains(r#"class="product-panel failed""#));
    assert!(!panel.contains("Product not found"));
}

// =============================================================================
// Image Proxy
// =============================================================================

#[tokio::test]
async fn test_image_proxy_passes_bytes_through() {
    let mut ctx = TestContext::new().await;
    let _image = ctx
        .backend
        .mock("GET", "/api/product/1/image")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([0x89, b'P', b'N', b'G'])
        .create_async()
        .await;

    let response = ctx.client.get(ctx.url("/product/1/image")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(response.bytes().await.unwrap().as_ref(), [0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_image_proxy_falls_back_to_placeholder() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get(ctx.url("/product/1/image")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/svg+xml");
    assert!(response.text().await.unwrap().contains("<svg"));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_discards_cart_line_and_returns_home() {
    let mut ctx = TestContext::new().await;
    let product = product_json(1, "Widget", "tools", 10, 5);
    let _list = ctx.mock_products(&[product.clone()]).await;
    let _product = ctx.mock_product(&product).await;
    let delete = ctx
        .backend
        .mock("DELETE", "/api/product/1")
        .with_status(200)
        .create_async()
        .await;

    ctx.add_to_cart(1).await;
    ctx.add_to_cart(1).await;

    let page = ctx.submit("/product/1/delete", &[]).await;
    delete.assert_async().await;
    assert!(page.contains("Product deleted successfully"));
    assert!(page.contains(r#"<div class="grid">"#));

    let cart = ctx.page("/cart").await;
    assert!(cart.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_delete_failure_leaves_cart_untouched() {
    let mut ctx = TestContext::new().await;
    let product = product_json(1, "Widget", "tools", 10, 5);
    let _list = ctx.mock_products(&[product.clone()]).await;
    let _product = ctx.mock_product(&product).await;
    let _delete = ctx
        .backend
        .mock("DELETE", "/api/product/1")
        .with_status(500)
        .with_body("constraint violation")
        .create_async()
        .await;

    ctx.add_to_cart(1).await;

    let page = ctx.submit("/product/1/delete", &[]).await;
    assert!(page.contains("Failed to delete product"));
    assert!(page.contains(r#"hx-get="/product/1/panel""#));

    let cart = ctx.page("/cart").await;
    assert!(cart.contains(r#"<span class="quantity">1</span>"#));
}

// =============================================================================
// Editor Redirects
// =============================================================================

#[tokio::test]
async fn test_editor_forms_without_editor_are_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get(ctx.url("/product/update/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.client.get(ctx.url("/add_product")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editor_forms_redirect_to_editor() {
    let mut ctx = TestContext::with_editor(Some("http://editor.example/")).await;
    let _product = ctx.mock_product(&product_json(7, "Kettle", "kitchen", 30, 2)).await;
    let client = reqwest::Client::builder().redirect(Policy::none()).build().unwrap();

    let response = client.get(ctx.url("/product/update/7")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers()[LOCATION],
        "http://editor.example/product/update/7"
    );

    let response = client.get(ctx.url("/add_product")).send().await.unwrap();
    assert_eq!(response.headers()[LOCATION], "http://editor.example/add_product");
}

#[tokio::test]
async fn test_update_form_for_missing_product_is_not_found() {
    let mut ctx = TestContext::with_editor(Some("http://editor.example/")).await;
    let _missing = ctx
        .backend
        .mock("GET", "/api/product/8")
        .with_status(404)
        .create_async()
        .await;
    let client = reqwest::Client::builder().redirect(Policy::none()).build().unwrap();

    let response = client.get(ctx.url("/product/update/8")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_update_form_backend_failure_is_bad_gateway() {
    let mut ctx = TestContext::with_editor(Some("http://editor.example/")).await;
    let _broken = ctx
        .backend
        .mock("GET", "/api/product/9")
        .with_status(500)
        .with_body("database unavailable")
        .create_async()
        .await;
    let client = reqwest::Client::builder().redirect(Policy::none()).build().unwrap();

    let response = client.get(ctx.url("/product/update/9")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.text().await.unwrap(), "External service error");
}
