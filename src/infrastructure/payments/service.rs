//! Payment provider trait, payment intent model and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

use crate::error::AppError;

/// Lifecycle state of a payment intent, as reported by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

/// A processor-side payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentIntent {
    /// Reads a metadata entry as an integer id.
    pub fn metadata_id(&self, key: &str) -> Option<i64> {
        self.metadata.get(key).and_then(|v| v.parse().ok())
    }
}

/// Request to create a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIntent {
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub metadata: Vec<(String, String)>,
}

/// Errors raised by payment providers.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment request failed: {0}")]
    Request(String),
    #[error("payment processor returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("payment intent {0} not found")]
    NotFound(String),
    #[error("unreadable payment processor response: {0}")]
    Decode(String),
    #[error("malformed payment intent id")]
    InvalidId,
}

/// Checks that `id` has the shape of a payment intent id (`pi_` followed by
/// ASCII letters, digits or underscores) so it can be placed in a URL path.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidId`] otherwise.
pub fn check_intent_id(id: &str) -> Result<(), PaymentError> {
    let well_formed = id.len() <= 255
        && id
            .strip_prefix("pi_")
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'));

    if well_formed {
        Ok(())
    } else {
        Err(PaymentError::InvalidId)
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::NotFound(id) => AppError::not_found(
                "Payment intent not found",
                json!({ "payment_intent_id": id }),
            ),
            PaymentError::InvalidId => {
                AppError::bad_request("Malformed payment intent id", json!({}))
            }
            PaymentError::Api { status, message } => {
                tracing::warn!(status, body = %message, "Payment processor rejected the call");
                AppError::bad_gateway(
                    "Payment processor error",
                    json!({ "processor_status": status }),
                )
            }
            other => {
                tracing::warn!(error = %other, "Payment provider call failed");
                AppError::bad_gateway("Payment processor error", json!({}))
            }
        }
    }
}

/// Trait for the external payment processor.
///
/// # Implementations
///
/// - [`crate::infrastructure::payments::StripePaymentProvider`] - Stripe REST API
/// - [`crate::infrastructure::payments::OfflinePaymentProvider`] - In-memory, auto-succeeding
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a payment intent for `request.amount`.
    async fn create_intent(&self, request: CreateIntent) -> Result<PaymentIntent, PaymentError>;

    /// Fetches the current state of a payment intent.
    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;

    /// Short provider name reported by the health check.
    fn name(&self) -> &'static str;
}
