//! Youm's Interior customer client.
//!
//! Browses the catalog, keeps a cart in a local JSON file and submits
//! orders and contact messages to the storefront backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod commands;
pub mod render;
pub mod storage;

pub use client::{ClientError, StorefrontClient};
pub use commands::{CliError, Shop};
pub use storage::{DEFAULT_CART_FILE, JsonFileCartRepository};
