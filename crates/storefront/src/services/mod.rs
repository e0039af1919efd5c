//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `email` - Order and contact notifications over SMTP

pub mod email;

pub use email::{EmailError, EmailService, MemoryMailer, Mailer, OutgoingEmail, SmtpMailer};
