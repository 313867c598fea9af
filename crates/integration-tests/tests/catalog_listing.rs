//! Integration tests for the product listing.

#![allow(clippy::unwrap_used)]

use shopfront_integration_tests::{TestContext, product_json};

#[tokio::test]
async fn test_listing_renders_cards() {
    let mut ctx = TestContext::new().await;
    let _list = ctx
        .mock_products(&[product_json(1, "Widget", "tools", 10, 5)])
        .await;

    let page = ctx.page("/").await;

    assert!(page.contains("WIDGET"));
    assert!(page.contains("~ Acme"));
    assert!(page.contains("$10.00"));
    assert!(page.contains("Add to Cart"));
}

#[tokio::test]
async fn test_listing_renders_despite_numeric_release_date() {
    let mut ctx = TestContext::new().await;
    let mut epoch = product_json(1, "Widget", "tools", 10, 5);
    epoch["releaseDate"] = 1_706_745_600_000_i64.into();
    let mut odd = product_json(2, "Gadget", "tools", 7, 5);
    odd["releaseDate"] = serde_json::json!({"date": "2024-02-01"});
    let _list = ctx.mock_products(&[epoch, odd]).await;

    let page = ctx.page("/").await;

    assert!(page.contains("WIDGET"));
    assert!(page.contains("GADGET"));
    assert!(!page.contains("listing-error"));
}

#[tokio::test]
async fn test_long_names_are_truncated() {
    let mut ctx = TestContext::new().await;
    let _list = ctx
        .mock_products(&[product_json(1, "Ultralight Carbon Trail Runner", "shoes", 120, 5)])
        .await;

    let page = ctx.page("/").await;

    assert!(page.contains("ULTRALIGHT CARBON..."));
}

#[tokio::test]
async fn test_out_of_stock_renders_disabled() {
    let mut ctx = TestContext::new().await;
    let _list = ctx
        .mock_products(&[
            product_json(1, "Widget", "tools", 10, 5),
            product_json(2, "Sold Out", "tools", 10, 0),
        ])
        .await;

    let page = ctx.page("/").await;

    assert!(page.contains(r#"class="btn-add out-of-stock" disabled>Out of Stock"#));
    assert_eq!(page.matches("Out of Stock").count(), 1);
}

#[tokio::test]
async fn test_category_filter_keeps_matches_in_order() {
    let mut ctx = TestContext::new().await;
    let _list = ctx
        .mock_products(&[
            product_json(1, "Hammer", "tools", 10, 5),
            product_json(2, "Sneaker", "shoes", 80, 5),
            product_json(3, "Scarf", "clothing", 15, 5),
        ])
        .await;

    let page = ctx.page("/?category=shoes").await;

    assert!(page.contains("SNEAKER"));
    assert!(!page.contains("HAMMER"));
    assert!(!page.contains("SCARF"));
    // Navigation still lists every category
    assert!(page.contains(r#"href="/?category=tools""#));
    assert!(page.contains(r#"href="/?category=shoes" class="selected""#));
}

#[tokio::test]
async fn test_unknown_category_shows_empty_state() {
    let mut ctx = TestContext::new().await;
    let _list = ctx
        .mock_products(&[product_json(1, "Hammer", "tools", 10, 5)])
        .await;

    let page = ctx.page("/?category=hats").await;

    assert!(page.contains("No Products Available"));
}

#[tokio::test]
async fn test_failed_image_uses_placeholder_per_product() {
    let mut ctx = TestContext::new().await;
    let _list = ctx
        .mock_products(&[
            product_json(1, "With Image", "misc", 10, 5),
            product_json(2, "Broken Image", "misc", 10, 5),
        ])
        .await;
    let _image = ctx
        .backend
        .mock("GET", "/api/product/1/image")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([0x89, b'P', b'N', b'G'])
        .create_async()
        .await;
    let _broken = ctx
        .backend
        .mock("GET", "/api/product/2/image")
        .with_status(500)
        .create_async()
        .await;

    let page = ctx.page("/").await;

    assert!(page.contains(r#"src="/product/1/image""#));
    assert!(page.contains(r#"src="/static/placeholder.svg" alt="Broken Image""#));
}

#[tokio::test]
async fn test_backend_failure_shows_error_state() {
    let ctx = TestContext::new().await;

    let page = ctx.page("/").await;

    assert!(page.contains("listing-error"));
    assert!(!page.contains("No Products Available"));
}

#[tokio::test]
async fn test_product_list_is_cached() {
    let mut ctx = TestContext::new().await;
    let body = serde_json::Value::Array(vec![product_json(1, "Widget", "tools", 10, 5)]);
    let list = ctx
        .backend
        .mock("GET", "/api/products")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    ctx.page("/").await;
    ctx.page("/?category=tools").await;

    list.assert_async().await;
}
