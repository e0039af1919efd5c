//! Durable storage contract for the cart.
//!
//! The cart is always written wholesale: `save` replaces whatever was stored
//! before. Implementations hold a single slot, the equivalent of one storage
//! key in the browser.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::cart::Cart;

/// Errors raised by a [`CartRepository`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("cart storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not a valid cart.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The storage slot is unusable (e.g. a poisoned lock).
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save contract for persisting a [`Cart`].
pub trait CartRepository {
    /// Load the stored cart. `Ok(None)` means nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` when the stored data cannot be decoded,
    /// or another variant when the medium cannot be read.
    fn load(&self) -> Result<Option<Cart>, StorageError>;

    /// Replace the stored cart with `cart`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the cart could not be written.
    fn save(&self, cart: &Cart) -> Result<(), StorageError>;
}

impl<R: CartRepository + ?Sized> CartRepository for &R {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        (**self).save(cart)
    }
}

/// In-memory repository holding the serialized cart.
///
/// Clones share the same slot, so a test can keep one handle while the
/// [`CartManager`](crate::manager::CartManager) owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryCartRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-loaded with raw stored text.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw stored text, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartRepository for InMemoryCartRepository {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        slot.as_deref()
            .map(serde_json::from_str::<Cart>)
            .transpose()
            .map_err(StorageError::from)
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *slot = Some(raw);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    #[test]
    fn test_empty_repository_loads_none() {
        let repo = InMemoryCartRepository::new();
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let repo = InMemoryCartRepository::new();
        let mut cart = Cart::new();
        cart.add(ProductId::new(3), 2);
        cart.add(ProductId::new(1), 1);

        repo.save(&cart).unwrap();
        assert_eq!(repo.load().unwrap(), Some(cart));
    }

    #[test]
    fn test_corrupt_slot_reports_error() {
        let repo = InMemoryCartRepository::with_raw("{broken");
        assert!(matches!(repo.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_clones_share_storage() {
        let repo = InMemoryCartRepository::new();
        let handle = repo.clone();
        let mut cart = Cart::new();
        cart.add(ProductId::new(5), 1);
        repo.save(&cart).unwrap();
        assert_eq!(handle.raw().as_deref(), Some(r#"[{"id":5,"qty":1}]"#));
    }
}
