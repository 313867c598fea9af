//! Shared page chrome: category navigation, cart badge, flash message.

use tower_sessions::Session;
use url::form_urlencoded;

use shopfront_core::{Cart, Product, catalog};

use crate::models::Flash;
use crate::services::take_flash;
use crate::state::AppState;

/// Link in the category navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub name: String,
    pub href: String,
    pub selected: bool,
}

/// Data every full page renders around its content.
#[derive(Debug, Clone, Default)]
pub struct LayoutView {
    pub categories: Vec<CategoryLink>,
    pub all_selected: bool,
    pub cart_count: u32,
    pub flash: Option<Flash>,
}

impl LayoutView {
    /// Build the layout from an already fetched product list.
    #[must_use]
    pub fn new(products: &[Product], selected: Option<&str>, cart: &Cart, flash: Option<Flash>) -> Self {
        let selected = selected.filter(|category| !category.is_empty());
        let categories = catalog::categories(products)
            .into_iter()
            .map(|name| CategoryLink {
                href: category_href(&name),
                selected: selected == Some(name.as_str()),
                name,
            })
            .collect();

        Self {
            categories,
            all_selected: selected.is_none(),
            cart_count: cart.item_count(),
            flash,
        }
    }

    /// Build the layout for pages that do not list products themselves.
    ///
    /// The category navigation is best effort: a catalog failure leaves it
    /// empty instead of failing the page.
    pub async fn load(state: &AppState, session: &Session, cart: &Cart) -> Self {
        let flash = take_flash(session).await;
        match state.catalog().products().await {
            Ok(products) => Self::new(&products, None, cart, flash),
            Err(e) => {
                tracing::debug!(error = %e, "Category navigation unavailable");
                Self::new(&[], None, cart, flash)
            }
        }
    }
}

/// Listing URL filtered to one category.
#[must_use]
pub fn category_href(category: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(category.as_bytes()).collect();
    format!("/?category={encoded}")
}
