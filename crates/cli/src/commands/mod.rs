//! CLI command implementations.
//!
//! Each command returns the text to print so it can be tested without a
//! terminal.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;

use boutique_core::{
    CartManager, Catalog, CatalogError, CheckoutError, DeliveryError, ProductId, StorageError,
    ValidationErrors,
};
use thiserror::Error;

use crate::client::StorefrontClient;
use crate::storage::JsonFileCartRepository;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error("{0}")]
    Delivery(#[from] DeliveryError),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Unknown product: #{0}")]
    UnknownProduct(ProductId),
}

/// Everything a command may touch: the server and the local cart.
#[derive(Debug)]
pub struct Shop {
    pub client: StorefrontClient,
    pub cart: CartManager<JsonFileCartRepository>,
}

impl Shop {
    #[must_use]
    pub fn open(client: StorefrontClient, repository: JsonFileCartRepository) -> Self {
        Self {
            client,
            cart: CartManager::open(repository),
        }
    }

    /// Fetch the catalog, falling back to an empty one when the server
    /// cannot be reached. Cart commands keep working offline; unknown
    /// products simply price at zero.
    pub async fn catalog_or_empty(&self) -> Catalog {
        self.client.fetch_catalog().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Catalog unavailable, continuing without prices");
            Catalog::default()
        })
    }
}
