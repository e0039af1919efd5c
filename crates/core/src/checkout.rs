//! Client-side checkout flow.
//!
//! ```text
//! Idle --open--> FormOpen --confirm--> Submitting --+--> Succeeded
//!                  ^   |                            |
//!                  |   +-- invalid form (stays)     +--> Failed --confirm--> Submitting
//!                  +------------- cancel ---------------------------------> Idle
//! ```
//!
//! The only await point is the call to the [`OrderDelivery`] collaborator.
//! The cart is cleared only after delivery succeeds; a failure leaves both
//! the cart and the form as they were.

use async_trait::async_trait;
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::manager::CartManager;
use crate::order::{CustomerDetails, CustomerInfo, OrderPayload};
use crate::repository::{CartRepository, StorageError};
use crate::validation::{ValidationErrors, non_blank, required, required_email};

/// Why a delivery attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The server refused the order as invalid.
    #[error("order rejected: {}", .0.join(", "))]
    Invalid(Vec<String>),

    /// The server accepted the request but could not send the emails.
    #[error("order could not be sent: {0}")]
    Rejected(String),

    /// The server could not be reached or answered nonsense.
    #[error("order service unreachable: {0}")]
    Unreachable(String),
}

/// Transmits an order to whoever sends the confirmation emails.
#[async_trait]
pub trait OrderDelivery: Send + Sync {
    /// Hand the order over. `Ok(())` means both emails went out.
    ///
    /// # Errors
    ///
    /// Returns a `DeliveryError` describing why the order was not accepted.
    async fn deliver(&self, order: &OrderPayload) -> Result<(), DeliveryError>;
}

/// Checkout errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,

    #[error("the checkout form is not open")]
    NotOpen,

    #[error("an order is already being submitted")]
    AlreadySubmitting,

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The order was sent but the cart could not be cleared afterwards.
    #[error("order sent but the cart could not be cleared: {0}")]
    Storage(#[from] StorageError),
}

/// Where the checkout flow currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    FormOpen,
    Submitting,
    Succeeded,
    /// Delivery failed; the form is still open with this message shown.
    Failed(String),
}

/// What the customer typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer: CustomerDetails,
    pub note: Option<String>,
}

impl CheckoutForm {
    /// Trim the inputs and check name, email and address. Phone is optional.
    ///
    /// # Errors
    ///
    /// Returns one error per missing or malformed field.
    pub fn validate(&self) -> Result<CustomerInfo, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let details = &self.customer;

        let name = required(details.name.as_deref(), "customer.name", &mut errors);
        let email = required_email(details.email.as_deref(), "customer.email", &mut errors);
        let address = required(details.address.as_deref(), "customer.address", &mut errors);

        match (name, email, address) {
            (Some(name), Some(email), Some(address)) => Ok(CustomerInfo {
                name,
                email,
                phone: non_blank(self.customer.phone.as_deref()),
                address,
            }),
            _ => Err(errors),
        }
    }
}

/// The checkout state machine for one storefront session.
#[derive(Debug, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Open the form. Rejected while the cart is empty.
    ///
    /// # Errors
    ///
    /// `EmptyCart` if there is nothing to order, `AlreadySubmitting` while a
    /// submission is pending.
    pub fn open(&mut self, cart: &Cart) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Submitting => Err(CheckoutError::AlreadySubmitting),
            _ if cart.is_empty() => Err(CheckoutError::EmptyCart),
            CheckoutState::Idle | CheckoutState::Succeeded => {
                self.state = CheckoutState::FormOpen;
                Ok(())
            }
            CheckoutState::FormOpen | CheckoutState::Failed(_) => Ok(()),
        }
    }

    /// Close the form without ordering.
    pub fn cancel(&mut self) {
        self.state = CheckoutState::Idle;
    }

    /// Validate the form, assemble the order and hand it to `delivery`.
    ///
    /// On success the cart is cleared and the state becomes `Succeeded`. On
    /// delivery failure the state becomes `Failed` and the cart is left
    /// untouched. Validation problems and an empty cart are reported
    /// before any delivery attempt and leave the form open.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`].
    pub async fn confirm<R, D>(
        &mut self,
        cart: &mut CartManager<R>,
        catalog: &Catalog,
        form: &CheckoutForm,
        delivery: &D,
    ) -> Result<OrderPayload, CheckoutError>
    where
        R: CartRepository,
        D: OrderDelivery + ?Sized,
    {
        match self.state {
            CheckoutState::FormOpen | CheckoutState::Failed(_) => {}
            CheckoutState::Submitting => return Err(CheckoutError::AlreadySubmitting),
            CheckoutState::Idle | CheckoutState::Succeeded => return Err(CheckoutError::NotOpen),
        }

        let customer = form.validate()?;
        let order = OrderPayload::assemble(cart.cart(), catalog, customer, form.note.clone())
            .ok_or(CheckoutError::EmptyCart)?;

        let submission = Submission::begin(&mut self.state);
        tracing::debug!(items = order.items.len(), total = %order.total, "Submitting order");

        match delivery.deliver(&order).await {
            Ok(()) => {
                submission.finish(CheckoutState::Succeeded);
                cart.clear()?;
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order delivery failed");
                submission.finish(CheckoutState::Failed(e.to_string()));
                Err(e.into())
            }
        }
    }
}

/// Holds the state at `Submitting` while delivery is awaited.
///
/// If the `confirm` future is dropped before delivery answers, the state
/// goes back to what it was, so the form can be submitted again.
struct Submission<'a> {
    state: &'a mut CheckoutState,
    resume: Option<CheckoutState>,
}

impl<'a> Submission<'a> {
    fn begin(state: &'a mut CheckoutState) -> Self {
        let resume = std::mem::replace(state, CheckoutState::Submitting);
        Self {
            state,
            resume: Some(resume),
        }
    }

    fn finish(mut self, next: CheckoutState) {
        self.resume = None;
        *self.state = next;
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if let Some(resume) = self.resume.take() {
            *self.state = resume;
        }
    }
}
