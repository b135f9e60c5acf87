//! Application error type and its HTTP representation.
//!
//! Every handler returns `Result<_, AppError>`. Errors are rendered as:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Hotel not found", "details": { "id": 7 } } }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    Forbidden { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    PaymentRequired { message: String, details: Value },
    BadGateway { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn payment_required(message: impl Into<String>, details: Value) -> Self {
        Self::PaymentRequired {
            message: message.into(),
            details,
        }
    }
    pub fn bad_gateway(message: impl Into<String>, details: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and stable error code for this variant.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            AppError::PaymentRequired { .. } => (StatusCode::PAYMENT_REQUIRED, "payment_required"),
            AppError::BadGateway { .. } => (StatusCode::BAD_GATEWAY, "payment_provider_error"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn parts(&self) -> (&str, &Value) {
        match self {
            AppError::Validation { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Forbidden { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::PaymentRequired { message, details }
            | AppError::BadGateway { message, details }
            | AppError::Internal { message, details } => (message, details),
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, code) = self.status_and_code();
        let (message, _) = self.parts();
        write!(f, "{code}: {message}")
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if let AppError::Internal { message, details } = &self {
            tracing::error!(%message, %details, "Request failed with internal error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        // RFC 6750
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            if db.is_foreign_key_violation() {
                return AppError::bad_request(
                    "Referenced record does not exist",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::forbidden("x", json!({})).status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::payment_required("x", json!({}))
                .status_and_code()
                .0,
            StatusCode::PAYMENT_REQUIRED
        );
    }

    #[test]
    fn test_error_info_keeps_details() {
        let err = AppError::not_found("Hotel not found", json!({ "id": 7 }));
        let info = err.to_error_info();
        assert_eq!(info.code, "not_found");
        assert_eq!(info.message, "Hotel not found");
        assert_eq!(info.details["id"], 7);
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn test_display() {
        let err = AppError::conflict("Email already registered", json!({}));
        assert_eq!(err.to_string(), "conflict: Email already registered");
    }
}
