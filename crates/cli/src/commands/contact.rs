//! Contact form.

use boutique_core::{ContactRequest, CustomerDetails};
use clap::Args;

use super::CliError;
use crate::client::StorefrontClient;

/// A message for the shop. Every field is required.
#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub message: String,
}

impl From<ContactArgs> for ContactRequest {
    fn from(args: ContactArgs) -> Self {
        Self {
            customer: Some(CustomerDetails {
                name: Some(args.name),
                email: Some(args.email),
                phone: Some(args.phone),
                address: None,
            }),
            note: Some(args.message),
        }
    }
}

/// Validate locally, then send the message.
///
/// # Errors
///
/// Returns `CliError::Validation` for missing fields before any request is
/// made, `CliError::Delivery` if the shop could not forward the message.
pub async fn run(client: &StorefrontClient, args: ContactArgs) -> Result<String, CliError> {
    let request = ContactRequest::from(args);
    request.clone().validate()?;

    client.send_contact(&request).await?;
    Ok("Message envoyé, merci ! Nous vous répondrons rapidement.".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_fields_rejected_before_sending() {
        // Nothing listens on port 9; validation must fail first.
        let client = StorefrontClient::new("http://127.0.0.1:9").unwrap();
        let args = ContactArgs {
            name: "Awa".to_string(),
            email: "awa@example.sn".to_string(),
            phone: "  ".to_string(),
            message: "Bonjour".to_string(),
        };

        let Err(CliError::Validation(errors)) = run(&client, args).await else {
            panic!("expected validation error");
        };
        assert!(errors.has_field("customer.phone"));
    }

    #[test]
    fn test_args_map_to_request() {
        let request = ContactRequest::from(ContactArgs {
            name: "Awa".to_string(),
            email: "awa@example.sn".to_string(),
            phone: "770000000".to_string(),
            message: "Bonjour".to_string(),
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["customer"]["phone"], "770000000");
        assert_eq!(json["note"], "Bonjour");
        assert!(json["customer"].get("address").is_none());
    }
}
