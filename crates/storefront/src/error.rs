//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the client sees a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use boutique_core::ValidationErrors;
use serde::Serialize;
use thiserror::Error;

use crate::services::email::EmailError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request body could not be read as JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body exceeded the size limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Sending a notification email failed.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),
}

/// JSON body of every `/api` response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            ok: true,
            error: None,
            errors: Vec::new(),
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            errors: Vec::new(),
        }
    }

    const fn invalid(errors: Vec<String>) -> Self {
        Self {
            ok: false,
            error: None,
            errors,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Email(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose SMTP or internal details to clients
        let (status, body) = match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::invalid(errors.messages()),
            ),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ApiResponse::invalid(vec![message]))
            }
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiResponse::failure("Request body too large"),
            ),
            Self::Email(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failure("Failed to send email"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::ValidationError;
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("body is not valid JSON".to_string());
        assert_eq!(err.to_string(), "Bad request: body is not valid JSON");

        let err = AppError::Email(EmailError::InvalidAddress("ceo@".to_string()));
        assert_eq!(err.to_string(), "Email error: Invalid email address: ceo@");
    }

    #[test]
    fn test_ok_response_serializes_minimal() {
        let json = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_validation_lists_every_error() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::required("customer.email"));
        errors.push(ValidationError::new("total", "must be a positive number"));

        let (status, body) = body_json(AppError::from(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(
            body["errors"],
            serde_json::json!([
                "customer.email is required",
                "total must be a positive number"
            ])
        );
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_email_errors_hide_details() {
        let (status, body) =
            body_json(AppError::Email(EmailError::InvalidAddress("secret@".to_string()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Failed to send email");
        assert!(!body.to_string().contains("secret@"));
    }

    #[tokio::test]
    async fn test_bad_request_is_listed() {
        let (status, body) = body_json(AppError::BadRequest("EOF while parsing".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], serde_json::json!(["EOF while parsing"]));
    }
}
