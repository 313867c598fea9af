//! View models for templates.
//!
//! Handlers turn core types into these preformatted structs so templates
//! only deal with strings, numbers, and flags.

mod layout;

pub use layout::{CategoryLink, LayoutView, category_href};

use shopfront_core::catalog::StockControl;
use shopfront_core::checkout::CheckoutSummary;
use shopfront_core::{CartLine, CurrencyCode, Order, Product, ProductId};

/// Image shown when a product has no image or it could not be fetched.
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";

/// Card names longer than this are truncated.
const CARD_NAME_LIMIT: usize = 20;
/// Characters kept from a truncated card name.
const CARD_NAME_KEEP: usize = 17;

// =============================================================================
// Load State
// =============================================================================

/// Asynchronous initialization state of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// The data has been requested but has not arrived.
    Loading,
    /// The request failed; holds a user-facing message.
    Failed(String),
    /// The data is available.
    Ready(T),
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// =============================================================================
// Stock Control
// =============================================================================

/// Add / stepper control state for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub product_id: i64,
    pub in_cart: bool,
    pub quantity: u32,
    pub out_of_stock: bool,
    pub can_increment: bool,
}

impl ControlView {
    #[must_use]
    pub const fn new(product_id: ProductId, control: StockControl) -> Self {
        match control {
            StockControl::AddToCart { out_of_stock } => Self {
                product_id: product_id.as_i64(),
                in_cart: false,
                quantity: 0,
                out_of_stock,
                can_increment: !out_of_stock,
            },
            StockControl::Stepper {
                quantity,
                can_increment,
            } => Self {
                product_id: product_id.as_i64(),
                in_cart: true,
                quantity,
                out_of_stock: false,
                can_increment,
            },
        }
    }

    /// Control for a product given its current cart quantity.
    #[must_use]
    pub fn for_product(product: &Product, cart_quantity: u32) -> Self {
        Self::new(product.id, StockControl::for_product(product, cart_quantity))
    }
}

// =============================================================================
// Products
// =============================================================================

/// URL of a product's image, served through the image proxy.
#[must_use]
pub fn product_image_url(id: ProductId) -> String {
    format!("/product/{id}/image")
}

/// Upper-cased card title, truncated with an ellipsis when too long.
#[must_use]
pub fn card_name(name: &str) -> String {
    if name.chars().count() > CARD_NAME_LIMIT {
        let kept: String = name.chars().take(CARD_NAME_KEEP).collect();
        format!("{}...", kept.to_uppercase())
    } else {
        name.to_uppercase()
    }
}

/// Product card in the listing grid.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub brand: String,
    pub price: String,
    pub image_url: String,
    pub control: ControlView,
}

impl ProductCard {
    /// Build a card. `image_ok` is whether the product's image could be fetched.
    #[must_use]
    pub fn new(product: &Product, image_ok: bool, cart_quantity: u32, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i64(),
            name: card_name(&product.name),
            full_name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.unit_price(currency).display(),
            image_url: if image_ok {
                product_image_url(product.id)
            } else {
                PLACEHOLDER_IMAGE.to_string()
            },
            control: ControlView::for_product(product, cart_quantity),
        }
    }
}

/// Full product detail.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub listed: Option<String>,
    pub stock_quantity: i32,
    pub image_url: String,
    pub control: ControlView,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, cart_quantity: u32, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.unit_price(currency).display(),
            listed: product
                .release_date
                .map(|date| date.format("%-m/%-d/%Y").to_string()),
            stock_quantity: product.stock_quantity,
            image_url: if product.has_image() {
                product_image_url(product.id)
            } else {
                PLACEHOLDER_IMAGE.to_string()
            },
            control: ControlView::for_product(product, cart_quantity),
        }
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

// =============================================================================
// Cart and Checkout
// =============================================================================

/// One cart line on the cart page.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: String,
    pub control: ControlView,
}

impl CartLineView {
    #[must_use]
    pub fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        let product = &line.product;
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            unit_price: product.unit_price(currency).display(),
            line_total: line.line_price(currency).display(),
            image_url: if product.has_image() {
                product_image_url(product.id)
            } else {
                PLACEHOLDER_IMAGE.to_string()
            },
            control: ControlView::for_product(product, line.quantity),
        }
    }
}

/// One line in the checkout overlay.
#[derive(Debug, Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Checkout overlay contents.
#[derive(Debug, Clone)]
pub struct CheckoutView {
    pub lines: Vec<CheckoutLineView>,
    pub total: String,
}

impl From<&CheckoutSummary> for CheckoutView {
    fn from(summary: &CheckoutSummary) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| CheckoutLineView {
                    name: line.name.clone(),
                    image_url: if line.has_image {
                        product_image_url(line.product_id)
                    } else {
                        PLACEHOLDER_IMAGE.to_string()
                    },
                    quantity: line.quantity,
                    line_total: line.line_total.display(),
                })
                .collect(),
            total: summary.total.display(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One row of the order history.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: i64,
    pub item_count: usize,
    pub placed_at: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            item_count: order.item_count(),
            placed_at: order.placed_at_display(),
        }
    }
}
