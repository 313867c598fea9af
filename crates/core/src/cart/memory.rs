//! In-memory cart storage.

use std::sync::{Arc, Mutex};

use super::CartLine;
use super::store::{CartStorage, CartStorageError};

/// Cart storage holding the serialized payload in memory.
///
/// Clones share the same entry, so a test can keep a handle and inspect what
/// a [`super::CartStore`] wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    payload: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a raw payload.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    /// The raw stored payload, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Unavailable`] if the lock is poisoned.
    pub fn payload(&self) -> Result<Option<String>, CartStorageError> {
        self.payload
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| CartStorageError::Unavailable("memory storage poisoned".to_string()))
    }

    /// Parse the stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Corrupt`] if the payload is not a list of
    /// cart lines.
    pub fn lines(&self) -> Result<Option<Vec<CartLine>>, CartStorageError> {
        self.payload()?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| CartStorageError::Corrupt(e.to_string()))
            })
            .transpose()
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Result<Option<Vec<CartLine>>, CartStorageError> {
        self.lines()
    }

    async fn save(&self, lines: &[CartLine]) -> Result<(), CartStorageError> {
        let raw =
            serde_json::to_string(lines).map_err(|e| CartStorageError::Unavailable(e.to_string()))?;
        let mut guard = self
            .payload
            .lock()
            .map_err(|_| CartStorageError::Unavailable("memory storage poisoned".to_string()))?;
        *guard = Some(raw);
        Ok(())
    }
}
