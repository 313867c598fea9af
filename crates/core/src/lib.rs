//! Shopfront Core - Shared domain types and cart logic.
//!
//! This crate provides the types and state machines used by the storefront:
//! - `storefront` - Server-rendered shop UI over the remote catalog backend
//! - `integration-tests` - End-to-end router tests
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no HTTP
//! clients, no session handling. Cart persistence goes through the
//! [`cart::CartStorage`] port so any durable store can back it.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and timestamp helpers
//! - [`product`] - Catalog products as served by the backend
//! - [`order`] - Placed orders (read-only)
//! - [`cart`] - Cart lines, the cart store and its persistence port
//! - [`catalog`] - Category filtering and stock controls
//! - [`checkout`] - Checkout summary and overlay state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartStorage, CartStorageError, CartStore};
pub use order::{Order, OrderItem};
pub use product::Product;
pub use types::*;
