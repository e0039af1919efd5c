//! Value types shared by the catalog, cart and order modules.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::Price;
