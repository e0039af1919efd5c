//! Contact form route handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use boutique_core::ContactRequest;
use tracing::instrument;

use crate::error::{ApiResponse, Result};
use crate::state::AppState;

/// Submit a contact message.
///
/// POST /api/contact
///
/// Name, email, phone and message are all required. The message goes to
/// the merchant only, with the sender as reply-to.
#[instrument(skip_all, fields(email = tracing::field::Empty))]
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>> {
    let Json(request) = payload?;
    let message = request.validate()?;
    tracing::Span::current().record("email", message.email.as_str());

    state.email().send_contact_message(&message).await?;

    tracing::info!("Contact message forwarded");
    Ok(Json(ApiResponse::ok()))
}
