//! PaymentProvider port - hosted checkout session creation.
//!
//! The checkout initiator is an external collaborator: it carries the
//! ledger identity into the session's opaque metadata so the webhook can
//! later find the right row. Nothing else about the payment flow lives
//! in this crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::identity::Identity;

/// Request to create a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Identity to embed in session metadata.
    pub identity: Identity,
    /// Amount to charge, in cents (already clamped by the caller).
    pub amount_cents: i64,
    /// Redirect after successful payment.
    pub success_url: String,
    /// Redirect after cancelled payment.
    pub cancel_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionLink {
    /// Session id (`cs_...`).
    pub id: String,
    /// Hosted payment page URL to send the client to.
    pub url: String,
}

/// Payment provider failures.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// The provider rejected the request.
    #[error("payment provider rejected request: {0}")]
    Rejected(String),

    /// Network or transport failure reaching the provider.
    #[error("payment provider unreachable: {0}")]
    Network(String),
}

impl PaymentError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

/// Creates hosted payment sessions.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSessionLink, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _assert(_: &dyn PaymentProvider) {}
        fn _assert_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_send_sync::<std::sync::Arc<dyn PaymentProvider>>();
    }
}
