//! Boutique Core - catalog, cart and order logic for the Youm's Interior shop.
//!
//! This crate is used by both sides of the shop:
//! - `storefront` - validates incoming orders and contact messages
//! - `cli` - the customer-side client holding the cart
//!
//! # Architecture
//!
//! Like a browser tab, the client owns its cart and persists it through a
//! [`CartRepository`]; prices are never stored in the cart but joined from
//! the [`Catalog`] on demand. Checkout turns the cart into an
//! [`OrderPayload`] and hands it to an [`OrderDelivery`] implementation.
//! Nothing here performs network I/O.
//!
//! # Modules
//!
//! - [`types`] - product ids, CFA prices, email addresses
//! - [`catalog`] - the read-only product list
//! - [`cart`] / [`manager`] / [`repository`] - cart state and persistence
//! - [`order`] / [`validation`] - payloads and field-level validation
//! - [`checkout`] - the checkout state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod manager;
pub mod order;
pub mod repository;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartEntry, CartLine, parse_quantity};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{
    Checkout, CheckoutError, CheckoutForm, CheckoutState, DeliveryError, OrderDelivery,
};
pub use manager::CartManager;
pub use order::{
    ContactMessage, ContactRequest, CustomerDetails, CustomerInfo, OrderItem, OrderPayload,
    OrderRequest,
};
pub use repository::{CartRepository, InMemoryCartRepository, StorageError};
pub use types::*;
pub use validation::{ValidationError, ValidationErrors};
