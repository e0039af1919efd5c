//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # API (rate limited, CORS)
//! POST /api/checkout           - Email an order to the merchant and customer
//! POST /api/contact            - Email a contact message to the merchant
//!
//! # Files
//! GET  /data/*                 - Catalog JSON (DATA_DIR)
//! GET  /*                      - Public site (STATIC_DIR)
//! ```

pub mod checkout;
pub mod contact;

use axum::{Json, Router, routing::post};

use crate::error::ApiResponse;
use crate::state::AppState;

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::submit))
        .route("/contact", post(contact::submit))
}

/// Liveness health check endpoint.
///
/// Returns `{"ok":true}` if the server is running. SMTP is not checked.
pub async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::ok())
}
