//! Checkout route handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use boutique_core::OrderRequest;
use tracing::instrument;

use crate::error::{ApiResponse, Result};
use crate::state::AppState;

/// Submit an order.
///
/// POST /api/checkout
///
/// Validates the order, then emails the merchant and the customer. Nothing
/// is sent when validation fails.
#[instrument(skip_all, fields(customer = tracing::field::Empty, total = tracing::field::Empty))]
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>> {
    let Json(request) = payload?;

    let order = request.validate().inspect_err(|errors| {
        tracing::info!(errors = %errors, "Rejected invalid order");
    })?;

    let span = tracing::Span::current();
    span.record("customer", order.customer.email.as_str());
    span.record("total", order.total.amount());

    state.email().send_order_notifications(&order).await?;

    tracing::info!(items = order.items.len(), "Order notifications sent");
    Ok(Json(ApiResponse::ok()))
}
