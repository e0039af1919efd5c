//! Shopping cart entries and the pricing join against the catalog.
//!
//! A [`Cart`] is a list of `(product id, quantity)` pairs keyed by product id.
//! It never stores prices: totals are derived from the [`Catalog`] at the
//! time they are asked for, so a product removed from the catalog simply
//! contributes nothing.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::{Price, ProductId};

/// A product reference with its quantity. Quantity is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    #[serde(rename = "qty", alias = "quantity")]
    pub quantity: u32,
}

/// A cart entry joined with its catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// The ordered collection of cart entries.
///
/// Serializes as a bare JSON array of entries. Deserialization goes through
/// [`Cart::from_entries`] so stored data that breaks the invariants (zero
/// quantities, repeated ids) is repaired on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, dropping zero quantities and merging
    /// repeated product ids into the first occurrence.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            if entry.quantity > 0 {
                cart.add(entry.product_id, entry.quantity);
            }
        }
        cart
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Quantity held for a product, or `None` if it is not in the cart.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.find(id).map(|e| e.quantity)
    }

    /// Add `qty` units of a product. A zero `qty` counts as one unit.
    pub fn add(&mut self, id: ProductId, qty: u32) {
        let qty = qty.max(1);
        match self.find_mut(id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(qty),
            None => self.entries.push(CartEntry {
                product_id: id,
                quantity: qty,
            }),
        }
    }

    /// Add one unit. Returns `false` if the product is not in the cart.
    pub fn increment(&mut self, id: ProductId) -> bool {
        self.find_mut(id).is_some_and(|entry| {
            entry.quantity = entry.quantity.saturating_add(1);
            true
        })
    }

    /// Remove one unit; an entry at quantity 1 is removed entirely.
    /// Returns `false` if the product is not in the cart.
    pub fn decrement(&mut self, id: ProductId) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        if entry.quantity > 1 {
            entry.quantity -= 1;
        } else {
            self.remove(id);
        }
        true
    }

    /// Set the quantity of an existing entry, clamped to at least 1.
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        self.find_mut(id).is_some_and(|entry| {
            entry.quantity = quantity.max(1);
            true
        })
    }

    /// Remove an entry. Returns `false` if it was not present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of unit price times quantity. Unknown products contribute zero.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Price {
        self.entries
            .iter()
            .map(|e| {
                catalog
                    .price_of(e.product_id)
                    .map_or(Price::ZERO, |price| price.times(e.quantity))
            })
            .sum()
    }

    /// Entries joined with their products, skipping unknown products.
    #[must_use]
    pub fn lines<'a>(&self, catalog: &'a Catalog) -> Vec<CartLine<'a>> {
        self.entries
            .iter()
            .filter_map(|e| {
                catalog.get(e.product_id).map(|product| CartLine {
                    product,
                    quantity: e.quantity,
                    line_total: product.price.times(e.quantity),
                })
            })
            .collect()
    }

    fn find(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == id)
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == id)
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

/// Interpret raw quantity input the way a number field is read.
///
/// Leading whitespace and a sign are accepted, then the leading run of
/// digits is used (`"3.7"` is 3). Anything that does not produce a
/// positive number, such as `"abc"`, `""` or `"-5"`, becomes 1. Values too
/// large for `u32` saturate.
#[must_use]
pub fn parse_quantity(input: &str) -> u32 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..).unwrap_or("")),
        Some(b'+') => (false, s.get(1..).unwrap_or("")),
        _ => (false, s),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if negative || digits.is_empty() {
        return 1;
    }

    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    value.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(n: u32) -> ProductId {
        ProductId::new(n)
    }

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                {"id": 1, "name": "Fauteuil", "price": "15 000 CFA"},
                {"id": 2, "name": "Lampe", "price": 2500},
                {"id": 3, "name": "Tapis", "price": 30000}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_add_merges_into_existing_entry() {
        let mut cart = Cart::new();
        cart.add(id(1), 2);
        cart.add(id(1), 3);

        assert_eq!(
            cart.entries(),
            &[CartEntry {
                product_id: id(1),
                quantity: 5
            }]
        );
        assert_eq!(cart.total(&catalog()), Price::new(75_000));
    }

    #[test]
    fn test_add_zero_counts_as_one() {
        let mut cart = Cart::new();
        cart.add(id(2), 0);
        assert_eq!(cart.quantity_of(id(2)), Some(1));
    }

    #[test]
    fn test_decrement_at_one_removes_entry() {
        let mut cart = Cart::new();
        cart.add(id(1), 1);
        assert!(cart.decrement(id(1)));
        assert_eq!(cart.quantity_of(id(1)), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_above_one_keeps_entry() {
        let mut cart = Cart::new();
        cart.add(id(1), 3);
        cart.decrement(id(1));
        assert_eq!(cart.quantity_of(id(1)), Some(2));
    }

    #[test]
    fn test_increment_and_decrement_unknown_are_noops() {
        let mut cart = Cart::new();
        assert!(!cart.increment(id(9)));
        assert!(!cart.decrement(id(9)));
        assert!(!cart.set_quantity(id(9), 4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(id(1), 4);
        cart.set_quantity(id(1), 0);
        assert_eq!(cart.quantity_of(id(1)), Some(1));
        cart.set_quantity(id(1), parse_quantity("-5"));
        assert_eq!(cart.quantity_of(id(1)), Some(1));
        cart.set_quantity(id(1), parse_quantity("abc"));
        assert_eq!(cart.quantity_of(id(1)), Some(1));
        cart.set_quantity(id(1), parse_quantity("7"));
        assert_eq!(cart.quantity_of(id(1)), Some(7));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("-5"), 1);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity(" 12"), 12);
        assert_eq!(parse_quantity("+4"), 4);
        assert_eq!(parse_quantity("3.7"), 3);
        assert_eq!(parse_quantity("8 pieces"), 8);
        assert_eq!(parse_quantity("99999999999"), u32::MAX);
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::new();
        cart.add(id(1), 10);
        cart.add(id(2), 1);
        assert!(cart.remove(id(1)));
        assert!(!cart.remove(id(1)));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_total_ignores_products_missing_from_catalog() {
        let mut cart = Cart::new();
        cart.add(id(2), 2);
        cart.add(id(42), 7);
        assert_eq!(cart.total(&catalog()), Price::new(5_000));
        assert_eq!(cart.count(), 9);
        assert_eq!(cart.lines(&catalog()).len(), 1);
    }

    #[test]
    fn test_total_invariant_under_add_order() {
        let catalog = catalog();
        let ops = [(1, 2), (2, 1), (3, 4), (1, 1), (2, 3)];

        let mut forward = Cart::new();
        for (p, q) in ops {
            forward.add(id(p), q);
        }
        let mut backward = Cart::new();
        for (p, q) in ops.iter().rev() {
            backward.add(id(*p), *q);
        }

        assert_eq!(forward.total(&catalog), backward.total(&catalog));
        assert_eq!(forward.count(), backward.count());
    }

    #[test]
    fn test_count_matches_quantities_for_mixed_operations() {
        // Deterministic pseudo-random operation stream over a few ids.
        let mut cart = Cart::new();
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let product = id(seed % 4);
            match (seed >> 8) % 5 {
                0 => cart.add(product, (seed >> 16) % 4),
                1 => {
                    cart.increment(product);
                }
                2 | 3 => {
                    cart.decrement(product);
                }
                _ => {
                    cart.remove(product);
                }
            }

            let summed: u64 = cart.entries().iter().map(|e| u64::from(e.quantity)).sum();
            assert_eq!(cart.count(), summed);
            assert!(cart.entries().iter().all(|e| e.quantity >= 1));
        }
    }

    #[test]
    fn test_serialized_form_uses_id_and_qty() {
        let mut cart = Cart::new();
        cart.add(id(1), 5);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"[{"id":1,"qty":5}]"#);
    }

    #[test]
    fn test_deserialize_repairs_invariants() {
        let cart: Cart =
            serde_json::from_str(r#"[{"id":1,"qty":2},{"id":2,"qty":0},{"id":1,"qty":3}]"#)
                .unwrap();
        assert_eq!(
            cart.entries(),
            &[CartEntry {
                product_id: id(1),
                quantity: 5
            }]
        );
    }
}
