//! Product listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use futures::future::join_all;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::catalog::filter_by_category;

use crate::middleware::SessionCart;
use crate::services::take_flash;
use crate::state::AppState;
use crate::views::{LayoutView, LoadState, PLACEHOLDER_IMAGE, ProductCard, category_href};

/// Message shown when the product list cannot be fetched.
const LISTING_FAILED: &str = "We couldn't reach the catalog. Please try again later.";

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub listing: LoadState<Vec<ProductCard>>,
    pub return_to: String,
    pub error_image: &'static str,
}

/// Display the product listing, optionally filtered to one category.
///
/// Each product's image is requested concurrently; a product whose image cannot
/// be fetched gets the placeholder without affecting the rest of the grid.
#[instrument(skip(state, session, cart))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    SessionCart(cart): SessionCart,
    Query(query): Query<CatalogQuery>,
) -> HomeTemplate {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let flash = take_flash(&session).await;
    let currency = state.config().currency;

    let return_to = category.map_or_else(|| "/".to_string(), category_href);

    let (layout, listing) = match state.catalog().products().await {
        Ok(products) => {
            let visible = filter_by_category(&products, category);
            let images = join_all(
                visible
                    .iter()
                    .map(|product| state.catalog().product_image(product.id)),
            )
            .await;

            let cards = visible
                .iter()
                .zip(images)
                .map(|(product, image)| {
                    if let Err(e) = &image {
                        tracing::debug!(product_id = %product.id, error = %e, "Using placeholder image");
                    }
                    ProductCard::new(
                        product,
                        image.is_ok(),
                        cart.product_quantity(product.id),
                        currency,
                    )
                })
                .collect();

            (
                LayoutView::new(&products, category, cart.cart(), flash),
                LoadState::Ready(cards),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch product list");
            (
                LayoutView::new(&[], category, cart.cart(), flash),
                LoadState::Failed(LISTING_FAILED.to_string()),
            )
        }
    };

    HomeTemplate {
        layout,
        listing,
        return_to,
        error_image: PLACEHOLDER_IMAGE,
    }
}
