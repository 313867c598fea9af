//! Cart persistence over the visitor's session.

use tower_sessions::Session;

use shopfront_core::{CartLine, CartStorage, CartStorageError};

use crate::models::session_keys;

/// [`CartStorage`] keeping the cart lines under the session's `cart` entry.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self) -> Result<Option<Vec<CartLine>>, CartStorageError> {
        self.session
            .get::<Vec<CartLine>>(session_keys::CART)
            .await
            .map_err(|e| CartStorageError::Corrupt(e.to_string()))
    }

    async fn save(&self, lines: &[CartLine]) -> Result<(), CartStorageError> {
        self.session
            .insert(session_keys::CART, lines)
            .await
            .map_err(|e| CartStorageError::Unavailable(e.to_string()))
    }
}
