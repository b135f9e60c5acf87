//! Stripe payment intents over the REST API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use super::service::{CreateIntent, PaymentError, PaymentIntent, PaymentProvider, check_intent_id};

/// Stripe client for creating and retrieving payment intents.
///
/// Requests are form-encoded and authenticated with the secret key as a
/// bearer credential.
#[derive(Clone)]
pub struct StripePaymentProvider {
    client: Client,
    secret_key: String,
    api_base: String,
}

impl StripePaymentProvider {
    /// Creates a client for `api_base` (normally `https://api.stripe.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Request`] if the HTTP client cannot be built.
    pub fn new(secret_key: String, api_base: String) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        info!("Using Stripe payment provider");

        Ok(Self {
            client,
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn form_params(request: &CreateIntent) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        params.extend(
            request
                .metadata
                .iter()
                .map(|(k, v)| (format!("metadata[{k}]"), v.clone())),
        );
        params
    }

    async fn read_intent(
        response: reqwest::Response,
        id: Option<&str>,
    ) -> Result<PaymentIntent, PaymentError> {
        match (response.status(), id) {
            (status, _) if status.is_success() => response
                .json::<PaymentIntent>()
                .await
                .map_err(|e| PaymentError::Decode(e.to_string())),
            (StatusCode::NOT_FOUND, Some(id)) => Err(PaymentError::NotFound(id.to_string())),
            (status, _) => {
                let body = response.text().await.unwrap_or_default();
                Err(PaymentError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
    async fn create_intent(&self, request: CreateIntent) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .client
            .post(format!("{}/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&Self::form_params(&request))
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        let intent = Self::read_intent(response, None).await?;
        debug!(id = %intent.id, amount = intent.amount, "Created payment intent");
        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        check_intent_id(id)?;

        let response = self
            .client
            .get(format!("{}/payment_intents/{}", self.api_base, id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        Self::read_intent(response, Some(id)).await
    }

    fn name(&self) -> &'static str {
        "stripe"
    }
}
