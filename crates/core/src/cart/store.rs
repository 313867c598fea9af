//! Cart store and its persistence port.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

use super::{Cart, CartLine};
use crate::product::Product;
use crate::types::ProductId;

/// Errors raised by a [`CartStorage`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartStorageError {
    /// The persisted payload could not be read back as a cart.
    #[error("stored cart is unreadable: {0}")]
    Corrupt(String),

    /// The storage backend itself failed.
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for a single cart.
///
/// Implementations hold exactly one named entry: the serialized list of
/// cart lines. The futures are `Send` so stores can be backed by async
/// session stores inside request handlers.
pub trait CartStorage: Send + Sync {
    /// Read the persisted lines. `Ok(None)` means nothing was ever stored.
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<CartLine>>, CartStorageError>> + Send;

    /// Overwrite the persisted lines.
    fn save(&self, lines: &[CartLine]) -> impl Future<Output = Result<(), CartStorageError>> + Send;
}

/// A cart bound to its storage.
///
/// Every mutation updates the in-memory cart first and then writes it
/// through. A failed write is logged and otherwise ignored: the in-memory
/// cart stays the source of truth for the rest of the session.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, restoring any previously persisted cart.
    ///
    /// A missing, unreadable, or invariant-breaking payload yields an empty
    /// cart. Opening never fails.
    pub async fn open(storage: S) -> Self {
        let cart = match storage.load().await {
            Ok(Some(lines)) => Cart::from_lines(lines).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding invalid stored cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to restore cart, starting empty");
                Cart::new()
            }
        };

        debug!(lines = cart.lines().len(), "Cart opened");
        Self { cart, storage }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Quantity held for a product, 0 if absent.
    #[must_use]
    pub fn product_quantity(&self, product_id: ProductId) -> u32 {
        self.cart.quantity(product_id)
    }

    /// Add one unit of `product` and persist.
    pub async fn add_to_cart(&mut self, product: &Product) {
        self.cart.add(product);
        debug!(product_id = %product.id, quantity = self.cart.quantity(product.id), "Added to cart");
        self.persist().await;
    }

    /// Remove one unit of the product and persist.
    ///
    /// Does nothing (and writes nothing) if the product is not in the cart.
    pub async fn remove_from_cart(&mut self, product_id: ProductId) {
        if self.cart.remove(product_id) {
            debug!(%product_id, quantity = self.cart.quantity(product_id), "Removed from cart");
            self.persist().await;
        }
    }

    /// Drop the product's whole line and persist, e.g. after the product was
    /// deleted from the catalog.
    pub async fn discard_product(&mut self, product_id: ProductId) {
        if self.cart.remove_line(product_id) {
            debug!(%product_id, "Discarded cart line");
            self.persist().await;
        }
    }

    /// Empty the cart and persist the empty state.
    pub async fn clear_cart(&mut self) {
        self.cart.clear();
        debug!("Cart cleared");
        self.persist().await;
    }

    /// Consume the store, returning the cart.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    async fn persist(&self) {
        if let Err(e) = self.storage.save(self.cart.lines()).await {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}
