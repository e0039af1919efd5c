//! Order and contact payloads.
//!
//! Requests arrive with every field optional so that a missing, blank or
//! wrongly typed field becomes a [`ValidationError`] naming it, rather than
//! a generic decode failure. `validate` turns a request into the normalized payload
//! the notification sender works with.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::types::{Email, Price};
use crate::validation::{
    ValidationError, ValidationErrors, lenient, non_blank, required, required_email,
};

/// Customer fields as entered in a form or received over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub address: Option<String>,
}

/// Validated customer of an order. Phone is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
}

/// One priced line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub qty: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// The normalized order handed to the notification sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderPayload {
    /// Build an order from the cart, pricing each entry from the catalog.
    ///
    /// Entries whose product is no longer in the catalog are left out, and
    /// the total is the sum of the remaining line totals. Returns `None`
    /// when no entry could be priced.
    #[must_use]
    pub fn assemble(
        cart: &Cart,
        catalog: &Catalog,
        customer: CustomerInfo,
        note: Option<String>,
    ) -> Option<Self> {
        let items: Vec<OrderItem> = cart
            .lines(catalog)
            .into_iter()
            .map(|line| OrderItem {
                name: line.product.name.clone(),
                qty: line.quantity,
                unit_price: line.product.price,
                line_total: line.line_total,
            })
            .collect();

        if items.is_empty() {
            return None;
        }

        let total = items.iter().map(|item| item.line_total).sum();
        Some(Self {
            customer,
            items,
            total,
            note: non_blank(note.as_deref()),
        })
    }
}

/// An order line as received, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub qty: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub unit_price: Option<Price>,
    #[serde(deserialize_with = "lenient")]
    pub line_total: Option<Price>,
}

/// A checkout request as received, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    #[serde(deserialize_with = "lenient")]
    pub customer: Option<CustomerDetails>,
    #[serde(deserialize_with = "lenient")]
    pub items: Option<Vec<OrderItemRequest>>,
    #[serde(deserialize_with = "lenient")]
    pub total: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub note: Option<String>,
}

impl OrderRequest {
    /// Check required fields and build the normalized payload.
    ///
    /// Requires customer name, a well-formed email and an address, at least
    /// one item with a name and a quantity of 1 or more, and a positive
    /// whole-number total. A missing line total is derived from unit price
    /// and quantity.
    ///
    /// # Errors
    ///
    /// Returns every problem found, not just the first.
    pub fn validate(self) -> Result<OrderPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer = validate_order_customer(self.customer.unwrap_or_default(), &mut errors);
        let items = validate_items(self.items.unwrap_or_default(), &mut errors);
        let total = validate_total(self.total, &mut errors);

        match (customer, total) {
            (Some(customer), Some(total)) => errors.into_result(OrderPayload {
                customer,
                items,
                total,
                note: non_blank(self.note.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}

fn validate_order_customer(
    details: CustomerDetails,
    errors: &mut ValidationErrors,
) -> Option<CustomerInfo> {
    let name = required(details.name.as_deref(), "customer.name", errors);
    let email = required_email(details.email.as_deref(), "customer.email", errors);
    let address = required(details.address.as_deref(), "customer.address", errors);

    Some(CustomerInfo {
        name: name?,
        email: email?,
        phone: non_blank(details.phone.as_deref()),
        address: address?,
    })
}

fn validate_items(items: Vec<OrderItemRequest>, errors: &mut ValidationErrors) -> Vec<OrderItem> {
    if items.is_empty() {
        errors.push(ValidationError::new(
            "items",
            "must contain at least one item",
        ));
        return Vec::new();
    }

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let name = required(item.name.as_deref(), &format!("items[{i}].name"), errors);
            let qty = match item.qty {
                Some(qty) if qty >= 1 => Some(qty),
                _ => {
                    errors.push(ValidationError::new(
                        format!("items[{i}].qty"),
                        "must be at least 1",
                    ));
                    None
                }
            };

            let (name, qty) = (name?, qty?);
            let unit_price = item.unit_price.unwrap_or_default();
            Some(OrderItem {
                name,
                qty,
                unit_price,
                line_total: item.line_total.unwrap_or_else(|| unit_price.times(qty)),
            })
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn validate_total(total: Option<f64>, errors: &mut ValidationErrors) -> Option<Price> {
    match total {
        Some(t) if t.is_finite() && t > 0.0 => {
            if t.fract() == 0.0 {
                Some(Price::new(t as u64))
            } else {
                errors.push(ValidationError::new(
                    "total",
                    "must be a whole number of francs",
                ));
                None
            }
        }
        _ => {
            errors.push(ValidationError::new("total", "must be a positive number"));
            None
        }
    }
}

/// A contact form message as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    #[serde(deserialize_with = "lenient")]
    pub customer: Option<CustomerDetails>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub note: Option<String>,
}

/// A validated contact message. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub note: String,
}

impl ContactRequest {
    /// Check that name, email, phone and note are all present.
    ///
    /// # Errors
    ///
    /// Returns every missing or malformed field.
    pub fn validate(self) -> Result<ContactMessage, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let details = self.customer.unwrap_or_default();

        let name = required(details.name.as_deref(), "customer.name", &mut errors);
        let email = required_email(details.email.as_deref(), "customer.email", &mut errors);
        let phone = required(details.phone.as_deref(), "customer.phone", &mut errors);
        let note = required(self.note.as_deref(), "note", &mut errors);

        match (name, email, phone, note) {
            (Some(name), Some(email), Some(phone), Some(note)) => Ok(ContactMessage {
                name,
                email,
                phone,
                note,
            }),
            _ => Err(errors),
        }
    }
}
