//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing (?category= filters)
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check
//!
//! # Products
//! GET  /add_product            - Add-product form (external editor)
//! GET  /product/{id}           - Product detail shell
//! GET  /product/{id}/panel     - Product detail panel (HTMX fragment)
//! GET  /product/{id}/image     - Product image proxy
//! POST /product/{id}/delete    - Delete product
//! GET  /product/update/{id}    - Update-product form (external editor)
//!
//! # Cart
//! GET  /cart                   - Cart page (?checkout=open shows the overlay)
//! POST /cart/add               - Add one unit
//! POST /cart/remove            - Remove one unit
//! POST /cart/clear             - Empty the cart
//! POST /cart/checkout          - Confirm purchase
//!
//! # Orders
//! GET  /orders                 - Order history
//! ```

pub mod cart;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::Request,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{SessionLocks, request_id_middleware, serialize_session};
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/update/{id}", get(products::update_form))
        .route("/{id}", get(products::show))
        .route("/{id}/panel", get(products::panel))
        .route("/{id}/delete", post(products::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/checkout", post(cart::checkout))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Listing
        .route("/", get(home::home))
        .route("/add_product", get(products::add_form))
        // Product routes
        .nest("/product", product_routes())
        // Cart and checkout
        .nest("/cart", cart_routes())
        // Order history
        .route("/orders", get(orders::index))
}

/// Page routes behind the session, plus the image proxy, static assets, and
/// request tracing.
///
/// The session store is supplied by the caller so tests can use their own.
/// Sentry layers are added by the caller.
pub fn app<S>(session_layer: SessionManagerLayer<S>) -> Router<AppState>
where
    S: SessionStore + Clone,
{
    routes()
        .layer(session_layer)
        .layer(axum_middleware::from_fn_with_state(
            SessionLocks::new(),
            serialize_session,
        ))
        // No session: images load in parallel
        .route("/product/{id}/image", get(products::image))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}
