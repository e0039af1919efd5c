//! Email service for order and contact notifications.
//!
//! Uses SMTP via lettre for delivery with Askama templates. Every message
//! carries an HTML body and a plain text alternative.

use std::sync::{Arc, Mutex, PoisonError};

use askama::Template;
use async_trait::async_trait;
use boutique_core::{ContactMessage, OrderPayload};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A rendered message ready for a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Something that can put an email on the wire.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// # Errors
    ///
    /// Returns an `EmailError` if the message could not be built or sent.
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError>;
}

/// Mailer backed by an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    ///
    /// `smtp_secure` selects implicit TLS, otherwise the connection is
    /// upgraded with STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns error if the relay hostname is unusable.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let builder = if config.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(&email.to)?)
            .subject(&email.subject);
        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        let message = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(email.text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email.html),
                ),
        )?;

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

/// Mailer that keeps messages in memory instead of sending them.
///
/// Clones share the same outbox. `fail_on` makes sends to one recipient
/// fail, for exercising partial delivery.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail_on: Option<String>,
}

impl MemoryMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer that rejects every message addressed to `recipient`.
    #[must_use]
    pub fn failing_for(recipient: impl Into<String>) -> Self {
        Self {
            outbox: Arc::default(),
            fail_on: Some(recipient.into()),
        }
    }

    /// Messages accepted so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        if self.fail_on.as_deref() == Some(email.to.as_str()) {
            return Err(EmailError::InvalidAddress(email.to));
        }
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
        Ok(())
    }
}

// =============================================================================
// Templates
// =============================================================================

/// One order line with its amounts already formatted.
struct ItemView {
    name: String,
    qty: u32,
    unit_price: String,
    line_total: String,
}

/// Everything the order templates print, formatted once.
struct OrderView<'a> {
    shop_name: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
    customer_address: &'a str,
    note: &'a str,
    items: Vec<ItemView>,
    total: String,
}

impl<'a> OrderView<'a> {
    fn new(shop_name: &'a str, order: &'a OrderPayload) -> Self {
        Self {
            shop_name,
            customer_name: &order.customer.name,
            customer_email: order.customer.email.as_str(),
            customer_phone: order.customer.phone.as_deref().unwrap_or("-"),
            customer_address: &order.customer.address,
            note: order.note.as_deref().unwrap_or_default(),
            items: order
                .items
                .iter()
                .map(|item| ItemView {
                    name: item.name.clone(),
                    qty: item.qty,
                    unit_price: item.unit_price.display(),
                    line_total: item.line_total.display(),
                })
                .collect(),
            total: order.total.display(),
        }
    }
}

#[derive(Template)]
#[template(path = "email/order_merchant.html")]
struct OrderMerchantHtml<'a> {
    order: &'a OrderView<'a>,
}

#[derive(Template)]
#[template(path = "email/order_merchant.txt")]
struct OrderMerchantText<'a> {
    order: &'a OrderView<'a>,
}

#[derive(Template)]
#[template(path = "email/order_customer.html")]
struct OrderCustomerHtml<'a> {
    order: &'a OrderView<'a>,
}

#[derive(Template)]
#[template(path = "email/order_customer.txt")]
struct OrderCustomerText<'a> {
    order: &'a OrderView<'a>,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactHtml<'a> {
    shop_name: &'a str,
    message: &'a ContactMessage,
}

#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactText<'a> {
    shop_name: &'a str,
    message: &'a ContactMessage,
}

// =============================================================================
// Service
// =============================================================================

/// Composes shop notifications and hands them to a [`Mailer`].
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    merchant_address: String,
    shop_name: String,
}

impl EmailService {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, config: &EmailConfig) -> Self {
        Self {
            mailer,
            merchant_address: config.merchant_address.clone(),
            shop_name: config.shop_name.clone(),
        }
    }

    #[must_use]
    pub fn merchant_address(&self) -> &str {
        &self.merchant_address
    }

    /// Notify the merchant of a new order, then confirm it to the customer.
    ///
    /// Both messages are rendered before anything is sent. If the merchant
    /// email fails the customer email is not attempted.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render or either send fails.
    pub async fn send_order_notifications(&self, order: &OrderPayload) -> Result<(), EmailError> {
        let view = OrderView::new(&self.shop_name, order);

        let merchant = OutgoingEmail {
            to: self.merchant_address.clone(),
            reply_to: Some(order.customer.email.to_string()),
            subject: format!("Nouvelle commande - {}", order.customer.name),
            text: OrderMerchantText { order: &view }.render()?,
            html: OrderMerchantHtml { order: &view }.render()?,
        };
        let customer = OutgoingEmail {
            to: order.customer.email.to_string(),
            reply_to: None,
            subject: format!("Confirmation de votre commande - {}", self.shop_name),
            text: OrderCustomerText { order: &view }.render()?,
            html: OrderCustomerHtml { order: &view }.render()?,
        };

        self.mailer.send(merchant).await?;
        self.mailer.send(customer).await?;
        Ok(())
    }

    /// Forward a contact form message to the merchant.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render or the send fails.
    pub async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), EmailError> {
        let shop_name = self.shop_name.as_str();
        let email = OutgoingEmail {
            to: self.merchant_address.clone(),
            reply_to: Some(message.email.to_string()),
            subject: format!("Nouveau message de {}", message.name),
            text: ContactText { shop_name, message }.render()?,
            html: ContactHtml { shop_name, message }.render()?,
        };

        self.mailer.send(email).await
    }
}
