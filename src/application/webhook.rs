//! Payment webhook reconciler.
//!
//! Per delivery: `Received -> SignatureVerified -> {Applied | Ignored |
//! Duplicate | Rejected}`. Only a signature failure rejects the
//! delivery; everything after verification acknowledges with success so
//! Stripe stops redelivering. A redelivered session id short-circuits to
//! `Duplicate` without touching the balance.

use std::sync::Arc;

use crate::config::QuotaConfig;
use crate::domain::identity::Identity;
use crate::domain::ledger::{credits_for_amount, LedgerError};
use crate::domain::payment::{StripeEvent, WebhookVerifier};
use crate::ports::{DonationRecord, LedgerStore, TopUpOutcome};

/// Terminal state of a verified webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Credits were applied to the identity's ledger.
    Applied {
        identity: Identity,
        credited: u32,
    },
    /// Verified but not applicable (wrong type, no identity metadata,
    /// malformed session object).
    Ignored(&'static str),
    /// Same checkout-session id seen before; no ledger change.
    Duplicate,
}

/// Verifies and applies asynchronous payment events.
pub struct PaymentWebhookHandler {
    verifier: WebhookVerifier,
    store: Arc<dyn LedgerStore>,
    quota: QuotaConfig,
}

impl PaymentWebhookHandler {
    pub fn new(verifier: WebhookVerifier, store: Arc<dyn LedgerStore>, quota: QuotaConfig) -> Self {
        Self {
            verifier,
            store,
            quota,
        }
    }

    /// Processes one raw delivery.
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid` for any verification failure (the only error
    ///   that should produce a non-2xx response)
    /// - `StoreUnavailable` if the ledger write fails; Stripe will
    ///   redeliver and the idempotency guard absorbs the retry
    pub async fn handle(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookOutcome, LedgerError> {
        let event = self
            .verifier
            .verify_and_parse(payload, signature_header)
            .map_err(|e| LedgerError::SignatureInvalid(e.to_string()))?;

        self.apply(event).await
    }

    async fn apply(&self, event: StripeEvent) -> Result<WebhookOutcome, LedgerError> {
        if !event.is_checkout_completed() {
            tracing::debug!(event_id = %event.id, event_type = %event.event_type, "ignoring event");
            return Ok(WebhookOutcome::Ignored("unhandled event type"));
        }

        let session = match event.checkout_session() {
            Ok(session) => session,
            Err(e) => {
                // Verified but unprocessable; a non-2xx would only make
                // Stripe redeliver the same malformed payload.
                tracing::warn!(event_id = %event.id, "malformed checkout session: {e}");
                return Ok(WebhookOutcome::Ignored("malformed checkout session"));
            }
        };

        let Some(identity) = session.identity() else {
            tracing::warn!(session_id = %session.id, "checkout session has no identity metadata");
            return Ok(WebhookOutcome::Ignored("no identity metadata"));
        };

        let credited = credits_for_amount(session.amount_total, self.quota.cents_per_credit);
        let donation = DonationRecord {
            session_id: session.id.clone(),
            identity: identity.clone(),
            amount_cents: session.amount_total,
        };

        match self.store.top_up(&identity, credited, &donation).await? {
            TopUpOutcome::Applied(record) => {
                tracing::info!(
                    identity = %identity,
                    session_id = %session.id,
                    credited,
                    credits = record.credits,
                    "donation applied"
                );
                Ok(WebhookOutcome::Applied { identity, credited })
            }
            TopUpOutcome::Duplicate => {
                tracing::info!(session_id = %session.id, "duplicate delivery, already applied");
                Ok(WebhookOutcome::Duplicate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;
    use crate::domain::ledger::UsageRecord;
    use crate::domain::payment::sign_test_payload;

    const SECRET: &str = "whsec_test";

    fn handler(store: Arc<InMemoryLedgerStore>) -> PaymentWebhookHandler {
        PaymentWebhookHandler::new(WebhookVerifier::new(SECRET), store, QuotaConfig::default())
    }

    fn completed_event(session_id: &str, amount: i64, metadata: serde_json::Value) -> String {
        serde_json::json!({
            "id": format!("evt_{session_id}"),
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": session_id,
                "amount_total": amount,
                "metadata": metadata
            }}
        })
        .to_string()
    }

    fn signed(payload: &str) -> String {
        sign_test_payload(SECRET, chrono::Utc::now().timestamp(), payload)
    }

    #[tokio::test]
    async fn applies_credits_for_completed_checkout() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        // 500 cents at 50 cents/credit = 10 credits.
        let payload = completed_event("cs_1", 500, serde_json::json!({"user_id": "u1"}));

        let outcome = handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();

        let identity = Identity::account("u1").unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Applied {
                identity: identity.clone(),
                credited: 10
            }
        );
        assert_eq!(store.get(&identity).await.unwrap(), UsageRecord::new(0, 10));
    }

    #[tokio::test]
    async fn replayed_event_applies_once() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        let payload = completed_event("cs_1", 500, serde_json::json!({"user_id": "u1"}));

        handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();
        let replay = handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();

        assert_eq!(replay, WebhookOutcome::Duplicate);
        let identity = Identity::account("u1").unwrap();
        assert_eq!(store.get(&identity).await.unwrap().credits, 10);
    }

    #[tokio::test]
    async fn distinct_sessions_both_apply() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        let first = completed_event("cs_1", 500, serde_json::json!({"device_id": "d1"}));
        let second = completed_event("cs_2", 250, serde_json::json!({"device_id": "d1"}));

        handler.handle(first.as_bytes(), &signed(&first)).await.unwrap();
        handler.handle(second.as_bytes(), &signed(&second)).await.unwrap();

        let identity = Identity::device("d1").unwrap();
        assert_eq!(store.get(&identity).await.unwrap().credits, 15);
    }

    #[tokio::test]
    async fn top_up_preserves_free_used() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let identity = Identity::device("d1").unwrap();
        store.set(&identity, UsageRecord::new(2, 1)).await.unwrap();

        let handler = handler(Arc::clone(&store));
        let payload = completed_event("cs_1", 100, serde_json::json!({"device_id": "d1"}));
        handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();

        assert_eq!(store.get(&identity).await.unwrap(), UsageRecord::new(2, 3));
    }

    #[tokio::test]
    async fn irrelevant_event_type_is_ignored() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        let payload = serde_json::json!({
            "id": "evt_x",
            "type": "invoice.paid",
            "data": { "object": {} }
        })
        .to_string();

        let outcome = handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored("unhandled event type"));
    }

    #[tokio::test]
    async fn missing_identity_metadata_is_ignored() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        let payload = completed_event("cs_1", 500, serde_json::json!({}));

        let outcome = handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored("no identity metadata"));
    }

    #[tokio::test]
    async fn malformed_checkout_session_acknowledged_without_applying() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        // checkout.session.completed whose object has no session id.
        let payload = serde_json::json!({
            "id": "evt_x",
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": {"device_id": "d1"} } }
        })
        .to_string();

        let outcome = handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();

        assert_eq!(outcome, WebhookOutcome::Ignored("malformed checkout session"));
        let identity = Identity::device("d1").unwrap();
        assert_eq!(store.get(&identity).await.unwrap(), UsageRecord::zero());
    }

    #[tokio::test]
    async fn bad_signature_rejected_with_no_side_effects() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        let payload = completed_event("cs_1", 500, serde_json::json!({"device_id": "d1"}));
        let bad = sign_test_payload("whsec_wrong", chrono::Utc::now().timestamp(), &payload);

        let result = handler.handle(payload.as_bytes(), &bad).await;

        assert!(matches!(result, Err(LedgerError::SignatureInvalid(_))));
        let identity = Identity::device("d1").unwrap();
        assert_eq!(store.get(&identity).await.unwrap(), UsageRecord::zero());
    }

    #[tokio::test]
    async fn tiny_amount_still_grants_one_credit() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let handler = handler(Arc::clone(&store));
        let payload = completed_event("cs_1", 25, serde_json::json!({"device_id": "d1"}));

        let outcome = handler.handle(payload.as_bytes(), &signed(&payload)).await.unwrap();
        assert!(matches!(outcome, WebhookOutcome::Applied { credited: 1, .. }));
    }
}
