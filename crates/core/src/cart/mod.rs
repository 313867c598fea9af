//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, one per product id, in the
//! order products were first added. The cart itself is pure data; the
//! [`CartStore`] wraps it and writes it through a [`CartStorage`] port after
//! every mutation.
//!
//! The cart never rejects an add. Keeping quantities within a product's stock
//! is the job of the view layer (see [`crate::catalog::StockControl`]).

mod memory;
mod store;

pub use memory::MemoryCartStorage;
pub use store::{CartStorage, CartStorageError, CartStore};

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;
use crate::types::{CurrencyCode, Price, ProductId};

/// Invariant violations found when rebuilding a cart from stored lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
    #[error("cart holds more than one line for product {0}")]
    DuplicateLine(ProductId),
}

/// A product snapshot plus the quantity held in the cart.
///
/// Serialized as the product's own fields with `quantity` alongside, which
/// is the shape kept in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Product id of this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    /// Line total as a [`Price`].
    #[must_use]
    pub fn line_price(&self, currency: CurrencyCode) -> Price {
        self.product.unit_price(currency).times(self.quantity)
    }
}

/// Ordered collection of cart lines, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from stored lines, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if a line has quantity 0 or a product id
    /// appears twice.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.product_id()));
            }
            if !seen.insert(line.product_id()) {
                return Err(CartError::DuplicateLine(line.product_id()));
            }
        }
        Ok(Self { lines })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Remove one unit of the product.
    ///
    /// A line at quantity 1 is dropped entirely. Returns `false` if the
    /// product was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        if self.quantity(product_id) == 0 {
            return false;
        }

        if let Some(line) = self.line_mut(product_id).filter(|line| line.quantity > 1) {
            line.quantity -= 1;
        } else {
            self.remove_line(product_id);
        }
        true
    }

    /// Drop the whole line for a product regardless of its quantity.
    pub fn remove_line(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id() != product_id);
        self.lines.len() != before
    }

    /// Quantity held for a product, 0 if absent.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id() == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }
}
