//! Cart and checkout route handlers.
//!
//! Cart forms post back here and redirect to the page they came from
//! (`return_to`). The stock limit is enforced on add: the store itself
//! accepts any add, so this layer decides whether one is allowed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::ProductId;
use shopfront_core::catalog::StockControl;
use shopfront_core::checkout::{Checkout, CheckoutSummary};

use crate::error::add_breadcrumb;
use crate::middleware::SessionCart;
use crate::models::Flash;
use crate::services::set_flash;
use crate::state::AppState;
use crate::views::{CartLineView, CheckoutView, LayoutView};

const CART_PATH: &str = "/cart";

/// Cart page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    /// `open` shows the checkout overlay.
    pub checkout: Option<String>,
}

/// Add / remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Clear form data.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    pub return_to: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub checkout: Option<CheckoutView>,
    pub return_to: &'static str,
}

/// Only local absolute paths are followed; anything else goes home.
fn safe_return_to(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Display the cart, with the checkout overlay when requested.
#[instrument(skip(state, session, cart))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    SessionCart(cart): SessionCart,
    Query(query): Query<CartQuery>,
) -> CartShowTemplate {
    let currency = state.config().currency;
    let mut overlay = Checkout::default();
    if query.checkout.as_deref() == Some("open") {
        overlay.open();
    }

    let summary = CheckoutSummary::from_cart(cart.cart(), currency);

    CartShowTemplate {
        layout: LayoutView::load(&state, &session, cart.cart()).await,
        lines: cart
            .cart()
            .lines()
            .iter()
            .map(|line| CartLineView::new(line, currency))
            .collect(),
        total: summary.total.display(),
        checkout: overlay.is_open().then(|| CheckoutView::from(&summary)),
        return_to: CART_PATH,
    }
}

/// Add one unit of a product.
///
/// The product is fetched fresh so the stock check uses current stock.
#[instrument(skip(state, session, cart))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    SessionCart(mut cart): SessionCart,
    Form(form): Form<CartItemForm>,
) -> Redirect {
    let redirect = Redirect::to(safe_return_to(form.return_to.as_deref()));
    let id = form.product_id;

    let product = match state.catalog().product(id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            set_flash(&session, Flash::error("Product not found")).await;
            return redirect;
        }
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to fetch product for cart");
            set_flash(&session, Flash::error("Could not add product to cart")).await;
            return redirect;
        }
    };

    let quantity = cart.product_quantity(id);
    let control = StockControl::for_product(&product, quantity);
    if let Some(refusal) = control.refusal() {
        tracing::debug!(product_id = %id, quantity, "Add refused at stock limit");
        set_flash(&session, Flash::warning(refusal)).await;
        return redirect;
    }

    let product_id = id.to_string();
    add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));
    cart.add_to_cart(&product).await;

    if quantity == 0 {
        set_flash(&session, Flash::success("Product added to cart")).await;
    }
    redirect
}

/// Remove one unit of a product.
#[instrument(skip(cart))]
pub async fn remove(SessionCart(mut cart): SessionCart, Form(form): Form<CartItemForm>) -> Redirect {
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", product_id.as_str())]));

    cart.remove_from_cart(form.product_id).await;
    Redirect::to(safe_return_to(form.return_to.as_deref()))
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(SessionCart(mut cart): SessionCart, Form(form): Form<ReturnForm>) -> Redirect {
    add_breadcrumb("cart", "Clear cart", None);

    cart.clear_cart().await;
    Redirect::to(safe_return_to(form.return_to.as_deref()))
}

/// Confirm the purchase from the checkout overlay.
///
/// Reports success, clears the cart, then closes the overlay by returning
/// to the plain cart page.
#[instrument(skip(session, cart))]
pub async fn checkout(session: Session, SessionCart(mut cart): SessionCart) -> Redirect {
    if cart.cart().is_empty() {
        set_flash(&session, Flash::warning("Your cart is empty")).await;
        return Redirect::to(CART_PATH);
    }

    add_breadcrumb("cart", "Confirm purchase", None);

    let mut overlay = Checkout::Open;
    if let Some(message) = overlay.confirm(cart.clear_cart()).await {
        set_flash(&session, Flash::success(message)).await;
    }

    Redirect::to(CART_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_to_accepts_local_paths() {
        assert_eq!(safe_return_to(Some("/product/3")), "/product/3");
        assert_eq!(safe_return_to(Some("/?category=shoes")), "/?category=shoes");
    }

    #[test]
    fn test_return_to_rejects_external_targets() {
        assert_eq!(safe_return_to(None), "/");
        assert_eq!(safe_return_to(Some("")), "/");
        assert_eq!(safe_return_to(Some("https://evil.example")), "/");
        assert_eq!(safe_return_to(Some("//evil.example")), "/");
        assert_eq!(safe_return_to(Some("/\\evil.example")), "/");
    }
}
