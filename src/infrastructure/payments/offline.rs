//! In-memory payment provider for development without a processor account.

use async_trait::async_trait;
use rand::{Rng, distr::Alphanumeric};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::service::{CreateIntent, PaymentError, PaymentIntent, PaymentProvider, PaymentStatus};

/// Payment provider that accepts every charge immediately.
///
/// Intents live in process memory and are lost on restart. Never use in
/// production.
#[derive(Default)]
pub struct OfflinePaymentProvider {
    intents: Mutex<HashMap<String, PaymentIntent>>,
}

impl OfflinePaymentProvider {
    pub fn new() -> Self {
        warn!("STRIPE_SECRET_KEY not set, payments are simulated and always succeed");
        Self::default()
    }
}

#[async_trait]
impl PaymentProvider for OfflinePaymentProvider {
    async fn create_intent(&self, request: CreateIntent) -> Result<PaymentIntent, PaymentError> {
        let suffix: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        let id = format!("pi_offline_{suffix}");

        let intent = PaymentIntent {
            client_secret: Some(format!("{id}_secret")),
            id: id.clone(),
            amount: request.amount,
            currency: request.currency,
            status: PaymentStatus::Succeeded,
            metadata: request.metadata.into_iter().collect(),
        };

        self.intents.lock().await.insert(id, intent.clone());
        info!(id = %intent.id, amount = intent.amount, "Simulated payment intent");
        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        self.intents
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(id.to_string()))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
