//! Catalog projections and per-product cart controls.

use crate::product::Product;

/// Keep only products in `category`, preserving their relative order.
///
/// `None` or an empty category means no filter.
#[must_use]
pub fn filter_by_category<'a>(products: &'a [Product], category: Option<&str>) -> Vec<&'a Product> {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => products.iter().filter(|p| p.category == category).collect(),
        None => products.iter().collect(),
    }
}

/// Distinct non-empty categories, in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !product.category.is_empty() && !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// The cart control shown next to a product.
///
/// This is where the stock limit lives: the cart accepts any add, so the UI
/// decides whether an add is offered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockControl {
    /// Nothing in the cart yet. Disabled when the product is out of stock.
    AddToCart { out_of_stock: bool },
    /// Already in the cart: a -/+ stepper. `+` is disabled at the stock limit.
    Stepper { quantity: u32, can_increment: bool },
}

impl StockControl {
    /// Compute the control for a product given its current cart quantity.
    #[must_use]
    pub fn for_product(product: &Product, cart_quantity: u32) -> Self {
        let out_of_stock = product.is_out_of_stock();
        if cart_quantity == 0 {
            return Self::AddToCart { out_of_stock };
        }

        let reached_limit = i64::from(cart_quantity) >= i64::from(product.stock_quantity);
        Self::Stepper {
            quantity: cart_quantity,
            can_increment: !out_of_stock && !reached_limit,
        }
    }

    /// Whether adding one more unit is currently offered.
    #[must_use]
    pub const fn allows_add(&self) -> bool {
        match *self {
            Self::AddToCart { out_of_stock } => !out_of_stock,
            Self::Stepper { can_increment, .. } => can_increment,
        }
    }

    /// Why an add is refused, for user-facing messages.
    #[must_use]
    pub const fn refusal(&self) -> Option<&'static str> {
        match *self {
            Self::AddToCart { out_of_stock: true } => Some("Out of Stock"),
            Self::Stepper {
                can_increment: false,
                ..
            } => Some("Cannot add more. Stock limit reached."),
            _ => None,
        }
    }
}
