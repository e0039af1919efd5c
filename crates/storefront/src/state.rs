//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::email::{EmailService, Mailer};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and never mutated after
/// startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    email: EmailService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `mailer` - Transport used for every outgoing notification
    #[must_use]
    pub fn new(config: StorefrontConfig, mailer: Arc<dyn Mailer>) -> Self {
        let email = EmailService::new(mailer, &config.email);

        Self {
            inner: Arc::new(AppStateInner { config, email }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the notification service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }
}
