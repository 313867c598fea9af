//! Cart extractor.
//!
//! Opens the visitor's [`CartStore`] from the session for the duration of a
//! request. Requests sharing a session are serialized by
//! [`serialize_session`](super::serialize_session), so cart mutations never
//! interleave.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use shopfront_core::CartStore;

use crate::error::AppError;
use crate::services::SessionCartStorage;

/// Extractor yielding the visitor's cart store.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(SessionCart(mut cart): SessionCart) -> impl IntoResponse {
///     cart.clear_cart().await;
///     Redirect::to("/cart")
/// }
/// ```
pub struct SessionCart(pub CartStore<SessionCartStorage>);

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Ok(Self(CartStore::open(SessionCartStorage::new(session)).await))
    }
}
