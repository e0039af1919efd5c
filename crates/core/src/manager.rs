//! Cart manager: a [`Cart`] bound to its repository and change listeners.

use std::fmt;

use crate::cart::{Cart, parse_quantity};
use crate::catalog::Catalog;
use crate::repository::{CartRepository, StorageError};
use crate::types::{Price, ProductId};

type Listener = Box<dyn Fn(&Cart) + Send + Sync>;

/// Owns the current cart and keeps storage in step with it.
///
/// Every mutation saves the whole cart and then calls each subscribed
/// listener with the new state. Mutations on ids that are not in the cart
/// (increment, decrement, set quantity) change nothing and neither save nor
/// notify.
pub struct CartManager<R> {
    cart: Cart,
    repository: R,
    listeners: Vec<Listener>,
}

impl<R: CartRepository> CartManager<R> {
    /// Load the stored cart. Missing or unreadable data yields an empty cart.
    pub fn open(repository: R) -> Self {
        let cart = match repository.load() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored cart");
                Cart::new()
            }
        };

        Self {
            cart,
            repository,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Register a callback run after every persisted change.
    pub fn subscribe(&mut self, listener: impl Fn(&Cart) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the updated cart could not be saved.
    pub fn add(&mut self, id: ProductId, qty: u32) -> Result<(), StorageError> {
        self.update(|cart| {
            cart.add(id, qty);
            true
        })
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the updated cart could not be saved.
    pub fn increment(&mut self, id: ProductId) -> Result<(), StorageError> {
        self.update(|cart| cart.increment(id))
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the updated cart could not be saved.
    pub fn decrement(&mut self, id: ProductId) -> Result<(), StorageError> {
        self.update(|cart| cart.decrement(id))
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the updated cart could not be saved.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), StorageError> {
        self.update(|cart| cart.set_quantity(id, quantity))
    }

    /// Set a quantity from raw user input, see [`parse_quantity`].
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the updated cart could not be saved.
    pub fn set_quantity_input(&mut self, id: ProductId, input: &str) -> Result<(), StorageError> {
        self.set_quantity(id, parse_quantity(input))
    }

    /// Remove an entry. The cart is saved even when the id was absent.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the updated cart could not be saved.
    pub fn remove(&mut self, id: ProductId) -> Result<(), StorageError> {
        self.update(|cart| {
            cart.remove(id);
            true
        })
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the empty cart could not be saved.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.update(|cart| {
            cart.clear();
            true
        })
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Price {
        self.cart.total(catalog)
    }

    /// Apply `change` to a copy of the cart and adopt it once saved.
    ///
    /// `change` returns whether anything changed; a no-op neither saves nor
    /// notifies. A failed save leaves the current cart untouched.
    fn update(&mut self, change: impl FnOnce(&mut Cart) -> bool) -> Result<(), StorageError> {
        let mut next = self.cart.clone();
        if !change(&mut next) {
            return Ok(());
        }

        self.repository.save(&next)?;
        self.cart = next;
        for listener in &self.listeners {
            listener(&self.cart);
        }
        Ok(())
    }
}

impl<R> fmt::Debug for CartManager<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartManager")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
