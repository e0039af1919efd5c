//! HTTP client for the storefront backend.
//!
//! Fetches the catalog and submits orders and contact messages. Order
//! submission is exposed as an [`OrderDelivery`] so the checkout flow does
//! not know about HTTP.

use std::time::Duration;

use async_trait::async_trait;
use boutique_core::{
    Catalog, CatalogError, ContactRequest, DeliveryError, OrderDelivery, OrderPayload,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request timeout. SMTP round trips on the server side can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when building the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server URL is not usable.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// JSON body the storefront answers every `/api` call with.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiReply {
    ok: bool,
    error: Option<String>,
    errors: Vec<String>,
}

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not http(s) or the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("boutique-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch and decode `/data/products.json`.
    ///
    /// # Errors
    ///
    /// `CatalogError::Unavailable` if the request fails or returns a non-success
    /// status, `CatalogError::Decode` if the body is not a product list.
    pub async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let response = self
            .client
            .get(self.url("/data/products.json"))
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!(
                "catalog request returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        let catalog = Catalog::from_json(&body)?;

        tracing::debug!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Send a contact message to the merchant.
    ///
    /// # Errors
    ///
    /// Same mapping as order delivery: `Invalid` for a 400, `Rejected` for a
    /// server-side failure, `Unreachable` for transport problems.
    pub async fn send_contact(&self, message: &ContactRequest) -> Result<(), DeliveryError> {
        self.post("/api/contact", message).await
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DeliveryError::Unreachable(e.to_string()))?;
        let reply: Option<ApiReply> = serde_json::from_str(&text).ok();

        interpret(status, reply)
    }
}

/// Map a storefront answer onto the delivery outcome.
fn interpret(status: reqwest::StatusCode, reply: Option<ApiReply>) -> Result<(), DeliveryError> {
    match reply {
        Some(reply) if status.is_success() && reply.ok => Ok(()),
        Some(reply) if status == reqwest::StatusCode::BAD_REQUEST => {
            let mut errors = reply.errors;
            errors.extend(reply.error);
            Err(DeliveryError::Invalid(errors))
        }
        Some(ApiReply {
            error: Some(error), ..
        }) => Err(DeliveryError::Rejected(error)),
        Some(_) => Err(DeliveryError::Rejected(format!("server answered {status}"))),
        None if status == reqwest::StatusCode::TOO_MANY_REQUESTS => Err(DeliveryError::Rejected(
            "too many requests, try again in a minute".to_string(),
        )),
        None => Err(DeliveryError::Unreachable(format!(
            "unexpected response ({status})"
        ))),
    }
}

#[async_trait]
impl OrderDelivery for StorefrontClient {
    async fn deliver(&self, order: &OrderPayload) -> Result<(), DeliveryError> {
        self.post("/api/checkout", order).await
    }
}
