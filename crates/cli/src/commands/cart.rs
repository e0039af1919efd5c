//! Cart commands.
//!
//! Every change is written to the cart file before the updated cart is
//! printed.

use boutique_core::{CartManager, CartRepository, Catalog, ProductId};
use clap::Subcommand;

use super::{CliError, Shop};
use crate::render;

#[derive(Debug, Clone, Subcommand)]
pub enum CartAction {
    /// Show the cart with line totals
    Show,
    /// Add a product (merges with an existing entry)
    Add {
        /// Product id
        id: ProductId,
        /// Quantity to add; 0 counts as 1
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Increase a quantity by one
    Inc { id: ProductId },
    /// Decrease a quantity by one, removing the entry at zero
    Dec { id: ProductId },
    /// Set a quantity; anything below 1 or unparsable becomes 1
    Set {
        id: ProductId,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
}

/// Run a cart action against the local cart file.
///
/// # Errors
///
/// Returns error if the cart cannot be saved or an unknown product is added.
pub async fn run(shop: &mut Shop, action: CartAction) -> Result<String, CliError> {
    let catalog = shop.catalog_or_empty().await;
    apply(&mut shop.cart, &catalog, action)
}

/// Apply `action` and render the resulting cart.
///
/// Adding is refused for ids missing from a non-empty catalog. With no
/// catalog at all (server offline) the id is trusted.
///
/// # Errors
///
/// Returns error if the cart cannot be saved or an unknown product is added.
pub fn apply<R: CartRepository>(
    cart: &mut CartManager<R>,
    catalog: &Catalog,
    action: CartAction,
) -> Result<String, CliError> {
    match action {
        CartAction::Show => {}
        CartAction::Add { id, qty } => {
            if !catalog.is_empty() && catalog.get(id).is_none() {
                return Err(CliError::UnknownProduct(id));
            }
            cart.add(id, qty)?;
        }
        CartAction::Inc { id } => cart.increment(id)?,
        CartAction::Dec { id } => cart.decrement(id)?,
        CartAction::Set { id, value } => cart.set_quantity_input(id, &value)?,
        CartAction::Remove { id } => cart.remove(id)?,
        CartAction::Clear => cart.clear()?,
    }

    let mut out = render::cart(cart.cart(), catalog);
    if catalog.is_empty() && !cart.cart().is_empty() {
        out.push_str("\n(catalogue indisponible, prix non calculés)");
    }
    Ok(out)
}
