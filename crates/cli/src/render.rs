//! Plain text rendering of catalog and cart views.

use std::fmt::Write;

use boutique_core::{Cart, Catalog, OrderPayload, Product};

/// One line per product: id, name, price and category.
#[must_use]
pub fn products(products: &[&Product]) -> String {
    if products.is_empty() {
        return "Aucun produit trouvé.".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = write!(out, "#{:<4} {:<32} {:>12}", product.id, product.name, product.price);
        if !product.category.is_empty() {
            let _ = write!(out, "  [{}]", product.category);
        }
        out.push('\n');
    }
    out
}

/// Cart lines with quantities and line totals, then count and total.
///
/// Entries whose product is missing from the catalog are listed by id and
/// count toward the item count but not the total.
#[must_use]
pub fn cart(cart: &Cart, catalog: &Catalog) -> String {
    if cart.is_empty() {
        return "Votre panier est vide.".to_string();
    }

    let mut out = String::new();
    for entry in cart.entries() {
        match catalog.get(entry.product_id) {
            Some(product) => {
                let _ = writeln!(
                    out,
                    "#{:<4} {:<32} x{:<4} {:>12}",
                    product.id,
                    product.name,
                    entry.quantity,
                    product.price.times(entry.quantity)
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "#{:<4} {:<32} x{:<4} {:>12}",
                    entry.product_id, "(produit indisponible)", entry.quantity, "-"
                );
            }
        }
    }
    let _ = write!(
        out,
        "Articles : {}\nTotal : {}",
        cart.count(),
        cart.total(catalog)
    );
    out
}

/// Confirmation printed after a successful checkout.
#[must_use]
pub fn order_confirmation(order: &OrderPayload) -> String {
    format!(
        "Merci {} ! Votre commande de {} article(s) pour {} a bien été envoyée.\n\
         Une confirmation a été envoyée à {}.",
        order.customer.name,
        order.items.iter().map(|item| u64::from(item.qty)).sum::<u64>(),
        order.total,
        order.customer.email
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::ProductId;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                {"id": 1, "name": "Fauteuil", "price": "15 000 CFA", "category": "salon"},
                {"id": 2, "name": "Lampe", "price": 2500}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_products_lists_price_and_category() {
        let catalog = catalog();
        let all: Vec<&Product> = catalog.products().iter().collect();
        let out = products(&all);

        assert!(out.contains("Fauteuil"));
        assert!(out.contains("15 000 CFA"));
        assert!(out.contains("[salon]"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_products_empty() {
        assert_eq!(products(&[]), "Aucun produit trouvé.");
    }

    #[test]
    fn test_cart_shows_totals() {
        let mut c = Cart::new();
        c.add(ProductId::new(1), 2);
        c.add(ProductId::new(1), 3);
        let out = cart(&c, &catalog());

        assert!(out.contains("x5"));
        assert!(out.contains("Articles : 5"));
        assert!(out.ends_with("Total : 75 000 CFA"));
    }

    #[test]
    fn test_cart_with_unknown_product() {
        let mut c = Cart::new();
        c.add(ProductId::new(9), 1);
        let out = cart(&c, &Catalog::default());

        assert!(out.contains("(produit indisponible)"));
        assert!(out.ends_with("Total : 0 CFA"));
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart(&Cart::new(), &catalog()), "Votre panier est vide.");
    }
}
