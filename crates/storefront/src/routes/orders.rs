//! Order history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::SessionCart;
use crate::state::AppState;
use crate::views::{LayoutView, OrderRow};

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub layout: LayoutView,
    pub orders: Vec<OrderRow>,
}

/// Display placed orders.
///
/// A backend failure is logged and renders as an empty history.
#[instrument(skip(state, session, cart))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    SessionCart(cart): SessionCart,
) -> OrdersTemplate {
    let orders = state.catalog().orders().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch orders");
        Vec::new()
    });

    OrdersTemplate {
        layout: LayoutView::load(&state, &session, cart.cart()).await,
        orders: orders.iter().map(OrderRow::from).collect(),
    }
}
