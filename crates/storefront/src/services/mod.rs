//! Session-backed services used by the route handlers.
//!
//! - [`cart`] - Cart persistence over the visitor's session
//! - [`flash`] - One-shot user notifications

pub mod cart;
pub mod flash;

pub use cart::SessionCartStorage;
pub use flash::{set_flash, take_flash};
