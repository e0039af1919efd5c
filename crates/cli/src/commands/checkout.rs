//! Checkout: turn the cart into an order and send it to the shop.

use boutique_core::{
    CartManager, CartRepository, Catalog, Checkout, CheckoutForm, CustomerDetails, OrderDelivery,
};
use clap::Args;

use super::{CliError, Shop};
use crate::render;

/// Customer details for an order.
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    pub name: String,
    /// Email address for the confirmation
    #[arg(long)]
    pub email: String,
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Delivery address
    #[arg(long)]
    pub address: String,
    /// Note for the shop
    #[arg(long)]
    pub note: Option<String>,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            customer: CustomerDetails {
                name: Some(args.name),
                email: Some(args.email),
                phone: args.phone,
                address: Some(args.address),
            },
            note: args.note,
        }
    }
}

/// Order everything in the cart.
///
/// The catalog is required here: prices are taken from it, never from the
/// cart file.
///
/// # Errors
///
/// Returns error if the catalog is unavailable, the cart is empty, the
/// details are invalid or the shop could not send the order.
pub async fn run(shop: &mut Shop, args: CheckoutArgs) -> Result<String, CliError> {
    let catalog = shop.client.fetch_catalog().await?;
    submit(&mut shop.cart, &catalog, &args.into(), &shop.client).await
}

/// Drive the checkout flow once: open, confirm, report.
///
/// # Errors
///
/// See [`run`]. The cart is only cleared when delivery succeeds.
pub async fn submit<R, D>(
    cart: &mut CartManager<R>,
    catalog: &Catalog,
    form: &CheckoutForm,
    delivery: &D,
) -> Result<String, CliError>
where
    R: CartRepository,
    D: OrderDelivery + ?Sized,
{
    let mut checkout = Checkout::new();
    checkout.open(cart.cart())?;
    let order = checkout.confirm(cart, catalog, form, delivery).await?;

    tracing::info!(total = %order.total, "Order sent");
    Ok(render::order_confirmation(&order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use boutique_core::{
        CheckoutError, DeliveryError, InMemoryCartRepository, OrderPayload, ProductId,
    };

    use super::*;

    /// Records the last order and answers with a fixed outcome.
    struct Recorder {
        outcome: Result<(), DeliveryError>,
        last: Mutex<Option<OrderPayload>>,
    }

    impl Recorder {
        fn new(outcome: Result<(), DeliveryError>) -> Self {
            Self {
                outcome,
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl OrderDelivery for Recorder {
        async fn deliver(&self, order: &OrderPayload) -> Result<(), DeliveryError> {
            *self.last.lock().unwrap() = Some(order.clone());
            self.outcome.clone()
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_json(r#"[{"id": 1, "name": "Fauteuil", "price": 15000}]"#).unwrap()
    }

    fn args() -> CheckoutArgs {
        CheckoutArgs {
            name: "Awa Diop".to_string(),
            email: "awa@example.sn".to_string(),
            phone: None,
            address: "Rue 10, Dakar".to_string(),
            note: Some("Livraison le matin".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_sends_and_clears() {
        let mut cart = CartManager::open(InMemoryCartRepository::new());
        cart.add(ProductId::new(1), 5).unwrap();
        let delivery = Recorder::new(Ok(()));

        let out = submit(&mut cart, &catalog(), &args().into(), &delivery)
            .await
            .unwrap();

        assert!(out.contains("75 000 CFA"));
        assert!(cart.cart().is_empty());
        let sent = delivery.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.note.as_deref(), Some("Livraison le matin"));
    }

    #[tokio::test]
    async fn test_empty_cart_never_delivers() {
        let mut cart = CartManager::open(InMemoryCartRepository::new());
        let delivery = Recorder::new(Ok(()));

        let result = submit(&mut cart, &catalog(), &args().into(), &delivery).await;

        assert!(matches!(
            result,
            Err(CliError::Checkout(CheckoutError::EmptyCart))
        ));
        assert!(delivery.last.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_order_keeps_cart() {
        let mut cart = CartManager::open(InMemoryCartRepository::new());
        cart.add(ProductId::new(1), 2).unwrap();
        let delivery = Recorder::new(Err(DeliveryError::Rejected(
            "Failed to send email".to_string(),
        )));

        let result = submit(&mut cart, &catalog(), &args().into(), &delivery).await;

        assert!(matches!(
            result,
            Err(CliError::Checkout(CheckoutError::Delivery(_)))
        ));
        assert_eq!(cart.cart().quantity_of(ProductId::new(1)), Some(2));
    }
}
