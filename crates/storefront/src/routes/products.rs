//! Product detail route handlers.
//!
//! The detail page is a shell that loads its panel over HTMX, so the browser
//! shows a loading state until the product arrives.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::ProductId;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::models::Flash;
use crate::services::set_flash;
use crate::state::AppState;
use crate::views::{LayoutView, LoadState, ProductDetailView};

/// Placeholder served when a product image cannot be fetched.
const PLACEHOLDER_SVG: &str = include_str!("../../static/placeholder.svg");

const PRODUCT_NOT_FOUND: &str = "Product not found";
const PRODUCT_FAILED: &str = "We couldn't load this product. Please try again later.";

/// Product page shell template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutView,
    pub product_id: i64,
    pub panel: LoadState<ProductDetailView>,
    pub return_to: String,
}

/// Product panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_panel.html")]
pub struct ProductPanelTemplate {
    pub product_id: i64,
    pub panel: LoadState<ProductDetailView>,
    pub return_to: String,
}

fn product_path(id: ProductId) -> String {
    format!("/product/{id}")
}

/// Display the product page shell.
#[instrument(skip(state, session, cart), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    SessionCart(cart): SessionCart,
    Path(id): Path<ProductId>,
) -> ProductShowTemplate {
    ProductShowTemplate {
        layout: LayoutView::load(&state, &session, cart.cart()).await,
        product_id: id.as_i64(),
        panel: LoadState::Loading,
        return_to: product_path(id),
    }
}

/// Product panel fragment.
///
/// Fetched fresh on every request so the stock shown is current.
#[instrument(skip(state, cart), fields(product_id = %id))]
pub async fn panel(
    State(state): State<AppState>,
    SessionCart(cart): SessionCart,
    Path(id): Path<ProductId>,
) -> ProductPanelTemplate {
    let panel = match state.catalog().product(id).await {
        Ok(product) => LoadState::Ready(ProductDetailView::new(
            &product,
            cart.product_quantity(id),
            state.config().currency,
        )),
        Err(e) if e.is_not_found() => LoadState::Failed(PRODUCT_NOT_FOUND.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch product");
            LoadState::Failed(PRODUCT_FAILED.to_string())
        }
    };

    ProductPanelTemplate {
        product_id: id.as_i64(),
        panel,
        return_to: product_path(id),
    }
}

/// Proxy a product image from the backend.
///
/// Any failure serves the placeholder instead.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn image(State(state): State<AppState>, Path(id): Path<ProductId>) -> Response {
    match state.catalog().product_image(id).await {
        Ok(image) => ([(CONTENT_TYPE, image.content_type)], image.bytes).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Serving placeholder image");
            ([(CONTENT_TYPE, "image/svg+xml")], PLACEHOLDER_SVG).into_response()
        }
    }
}

/// Delete a product.
///
/// Cart and catalog are only touched after the backend confirms the delete.
/// On failure the visitor stays on the product page with an error message.
#[instrument(skip(state, session, cart), fields(product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    SessionCart(mut cart): SessionCart,
    Path(id): Path<ProductId>,
) -> Redirect {
    let product_id = id.to_string();
    add_breadcrumb("catalog", "Delete product", Some(&[("product_id", product_id.as_str())]));

    if let Err(e) = state.catalog().delete_product(id).await {
        tracing::error!(error = %e, "Failed to delete product");
        set_flash(&session, Flash::error("Failed to delete product")).await;
        return Redirect::to(&product_path(id));
    }

    cart.discard_product(id).await;
    if let Err(e) = state.catalog().refresh_products().await {
        tracing::warn!(error = %e, "Failed to refresh catalog after delete");
    }

    set_flash(&session, Flash::success("Product deleted successfully")).await;
    Redirect::to("/")
}

/// Add-product form, hosted by the external editor.
///
/// # Errors
///
/// Returns `AppError::NotFound` when no editor is configured.
#[instrument(skip(state))]
pub async fn add_form(State(state): State<AppState>) -> Result<Redirect> {
    editor_redirect(&state, "add_product")
}

/// Update-product form, hosted by the external editor.
///
/// The product is looked up first so a stale link never reaches the editor.
///
/// # Errors
///
/// Returns `AppError::NotFound` when no editor is configured or the product
/// does not exist, and `AppError::Catalog` when the backend fails.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let redirect = editor_redirect(&state, &format!("product/update/{id}"))?;
    state.catalog().product(id).await?;
    Ok(redirect)
}

fn editor_redirect(state: &AppState, path: &str) -> Result<Redirect> {
    let editor = state
        .config()
        .editor_url
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Product editor".to_string()))?;
    let target = editor
        .join(path)
        .map_err(|e| AppError::Internal(format!("Invalid editor URL: {e}")))?;

    Ok(Redirect::to(target.as_str()))
}
