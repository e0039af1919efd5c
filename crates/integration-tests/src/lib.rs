//! Integration tests for the Youm's Interior boutique.
//!
//! # Running Tests
//!
//! ```bash
//! # Everything that runs offline
//! cargo test -p boutique-integration-tests
//!
//! # Including the live SMTP test (needs SMTP_* and CEO_EMAIL set)
//! cargo test -p boutique-integration-tests -- --ignored
//! ```
//!
//! Each test starts its own storefront on an ephemeral port with an
//! in-memory mailer, so tests run in parallel without sharing state.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use boutique_storefront::config::{EmailConfig, StorefrontConfig};
use boutique_storefront::services::{Mailer, MemoryMailer};
use boutique_storefront::state::AppState;
use secrecy::SecretString;

/// Merchant address used by every test server.
pub const MERCHANT_EMAIL: &str = "ceo@youms.example";

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    pub addr: SocketAddr,
    pub mailer: MemoryMailer,
}

impl TestServer {
    /// Start a server that records emails instead of sending them.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::start_with(MemoryMailer::new(), false).await
    }

    /// Start a server with the given mailer and rate limiting switch.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start_with(mailer: MemoryMailer, rate_limit_enabled: bool) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let mut config = test_config();
        config.port = addr.port();
        config.rate_limit_enabled = rate_limit_enabled;

        let transport: Arc<dyn Mailer> = Arc::new(mailer.clone());
        let app = boutique_storefront::app(AppState::new(config, transport));

        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        Self { addr, mailer }
    }

    /// Base URL such as `http://127.0.0.1:54321`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Storefront configuration pointing at the repository's static and data
/// directories.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    let storefront = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");

    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        static_dir: storefront.join("static"),
        data_dir: storefront.join("data"),
        allowed_origins: Vec::new(),
        rate_limit_enabled: false,
        email: EmailConfig {
            smtp_host: "smtp.youms.example".to_string(),
            smtp_port: 587,
            smtp_secure: false,
            smtp_username: "boutique@youms.example".to_string(),
            smtp_password: SecretString::from("kL9#vQ2!xZ7@pR4$"),
            from_address: "boutique@youms.example".to_string(),
            merchant_address: MERCHANT_EMAIL.to_string(),
            shop_name: "Youm's Interior".to_string(),
        },
        sentry_dsn: None,
    }
}
