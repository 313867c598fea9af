//! Checkout summary and overlay state.
//!
//! Checkout here is the user-confirmed transition that finalizes the cart.
//! Order submission is not modeled; it belongs to whatever completion the
//! caller hands to [`Checkout::confirm`].

use std::future::Future;

use crate::cart::Cart;
use crate::types::{CurrencyCode, Price, ProductId};

/// Message reported when a purchase is confirmed.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

/// One row of the checkout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub name: String,
    pub has_image: bool,
    pub quantity: u32,
    pub line_total: Price,
}

/// Every cart line with its line total, plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub lines: Vec<CheckoutLine>,
    pub total: Price,
}

impl CheckoutSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart, currency: CurrencyCode) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| CheckoutLine {
                product_id: line.product_id(),
                name: line.product.name.clone(),
                has_image: line.product.has_image(),
                quantity: line.quantity,
                line_total: line.line_price(currency),
            })
            .collect();

        Self {
            lines,
            total: Price::new(cart.total(), currency),
        }
    }
}

/// Checkout overlay state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Checkout {
    #[default]
    Closed,
    Open,
}

impl Checkout {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn open(&mut self) {
        *self = Self::Open;
    }

    /// Dismiss without touching the cart.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Confirm the purchase.
    ///
    /// Reports success, runs `completion` (expected to clear the cart), then
    /// closes the overlay. Returns the success message, or `None` without
    /// running `completion` if the overlay was not open.
    pub async fn confirm<F>(&mut self, completion: F) -> Option<&'static str>
    where
        F: Future<Output = ()>,
    {
        if !self.is_open() {
            return None;
        }

        tracing::info!("Purchase confirmed");
        completion.await;
        self.close();
        Some(ORDER_PLACED_MESSAGE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{CartStore, MemoryCartStorage};
    use crate::product::fixtures::product;

    #[test]
    fn test_summary_line_and_grand_totals() {
        let mut cart = Cart::new();
        let a = product(1, 10);
        cart.add(&a);
        cart.add(&a);
        cart.add(&product(2, 5));

        let summary = CheckoutSummary::from_cart(&cart, CurrencyCode::USD);
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].quantity, 2);
        assert_eq!(summary.lines[0].line_total.amount, Decimal::from(20));
        assert_eq!(summary.lines[1].line_total.display(), "$5.00");
        assert_eq!(summary.total.display(), "$25.00");
    }

    #[test]
    fn test_empty_cart_summary() {
        let summary = CheckoutSummary::from_cart(&Cart::new(), CurrencyCode::USD);
        assert!(summary.lines.is_empty());
        assert_eq!(summary.total.amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_confirm_clears_cart_and_closes() {
        let mut store = CartStore::open(MemoryCartStorage::new()).await;
        store.add_to_cart(&product(1, 10)).await;

        let mut checkout = Checkout::default();
        checkout.open();
        let message = checkout.confirm(store.clear_cart()).await;

        assert_eq!(message, Some(ORDER_PLACED_MESSAGE));
        assert!(!checkout.is_open());
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_on_closed_overlay_does_nothing() {
        let mut store = CartStore::open(MemoryCartStorage::new()).await;
        store.add_to_cart(&product(1, 10)).await;

        let mut checkout = Checkout::Closed;
        assert_eq!(checkout.confirm(store.clear_cart()).await, None);
        assert_eq!(store.cart().item_count(), 1);
    }

    #[test]
    fn test_close_leaves_state_closed() {
        let mut checkout = Checkout::default();
        checkout.open();
        assert!(checkout.is_open());
        checkout.close();
        assert_eq!(checkout, Checkout::Closed);
    }
}
