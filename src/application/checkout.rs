//! Checkout initiator.
//!
//! Thin orchestration over the payment provider: clamps the requested
//! amount, builds the redirect URLs, and embeds the ledger identity in
//! session metadata so the webhook can find the right row later.

use std::sync::Arc;

use crate::config::{PaymentConfig, ServerConfig};
use crate::domain::identity::Identity;
use crate::domain::ledger::LedgerError;
use crate::ports::{CheckoutRequest, CheckoutSessionLink, PaymentError, PaymentProvider};

/// Creates hosted checkout sessions for credit donations.
pub struct CheckoutHandler {
    provider: Arc<dyn PaymentProvider>,
    min_amount_cents: i64,
    default_amount_cents: i64,
    app_url: String,
}

impl CheckoutHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        payment: &PaymentConfig,
        server: &ServerConfig,
    ) -> Self {
        Self {
            provider,
            min_amount_cents: payment.min_donation_cents,
            default_amount_cents: payment.default_donation_cents,
            app_url: server.app_url.clone(),
        }
    }

    /// Starts a checkout for `identity`; `amount_cents` falls back to
    /// the configured default and is clamped to the minimum.
    pub async fn create_session(
        &self,
        identity: Identity,
        amount_cents: Option<i64>,
    ) -> Result<CheckoutSessionLink, LedgerError> {
        let amount = amount_cents
            .unwrap_or(self.default_amount_cents)
            .max(self.min_amount_cents);

        let request = CheckoutRequest {
            identity: identity.clone(),
            amount_cents: amount,
            success_url: format!("{}/?donation=success", self.app_url),
            cancel_url: format!("{}/?donation=cancel", self.app_url),
        };

        let session = self.provider.create_checkout_session(request).await?;
        tracing::info!(identity = %identity, session_id = %session.id, amount, "checkout created");
        Ok(session)
    }
}

impl From<PaymentError> for LedgerError {
    fn from(err: PaymentError) -> Self {
        LedgerError::UpstreamPayment(err.to_string())
    }
}
