//! Payment processor integration.
//!
//! - [`StripePaymentProvider`] - Stripe payment intents over HTTPS
//! - [`OfflinePaymentProvider`] - Simulated processor for local development

mod offline;
mod service;
mod stripe;

pub use offline::OfflinePaymentProvider;
pub use service::{
    CreateIntent, PaymentError, PaymentIntent, PaymentProvider, PaymentStatus, check_intent_id,
};
pub use stripe::StripePaymentProvider;

#[cfg(test)]
pub use service::MockPaymentProvider;
