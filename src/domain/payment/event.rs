//! Stripe webhook event envelope.
//!
//! Only the fields the reconciler reads are modelled. Unknown event
//! types are carried as-is so the handler can acknowledge and ignore
//! them; Stripe retries on error responses, so unknown types must never
//! be treated as failures.

use serde::Deserialize;

use crate::domain::identity::Identity;

/// The only event type that results in a ledger write.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Parsed Stripe event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    /// Stripe event id (`evt_...`).
    pub id: String,
    /// Event type string, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload wrapper.
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// The event object; shape depends on `event_type`.
    pub object: serde_json::Value,
}

impl StripeEvent {
    pub fn is_checkout_completed(&self) -> bool {
        self.event_type == CHECKOUT_SESSION_COMPLETED
    }

    /// Parses the embedded object as a checkout session.
    pub fn checkout_session(&self) -> Result<CheckoutSession, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// Checkout session object embedded in a `checkout.session.completed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Checkout session id (`cs_...`); the idempotency key for top-ups.
    pub id: String,
    /// Total charged amount in cents.
    #[serde(default)]
    pub amount_total: i64,
    /// Opaque metadata set at checkout creation time.
    #[serde(default)]
    pub metadata: SessionMetadata,
}

/// Identity carried through checkout metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionMetadata {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CheckoutSession {
    /// The ledger identity this session was created for, if any.
    ///
    /// Account metadata wins over device metadata, matching the
    /// resolution order on the request path.
    pub fn identity(&self) -> Option<Identity> {
        if let Some(user_id) = self.metadata.user_id.as_deref() {
            if let Ok(identity) = Identity::account(user_id) {
                return Some(identity);
            }
        }
        if let Some(device_id) = self.metadata.device_id.as_deref() {
            if let Ok(identity) = Identity::device(device_id) {
                return Some(identity);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(payload: serde_json::Value) -> StripeEvent {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn parses_checkout_completed_event() {
        let event = parse(serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_1",
                "amount_total": 500,
                "metadata": { "device_id": "d1" }
            }}
        }));

        assert!(event.is_checkout_completed());
        let session = event.checkout_session().unwrap();
        assert_eq!(session.id, "cs_1");
        assert_eq!(session.amount_total, 500);
        assert_eq!(session.identity(), Some(Identity::Device("d1".into())));
    }

    #[test]
    fn account_metadata_wins_over_device() {
        let event = parse(serde_json::json!({
            "id": "evt_2",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_2",
                "amount_total": 1000,
                "metadata": { "device_id": "d1", "user_id": "u1" }
            }}
        }));

        let session = event.checkout_session().unwrap();
        assert_eq!(session.identity(), Some(Identity::Account("u1".into())));
    }

    #[test]
    fn missing_metadata_yields_no_identity() {
        let event = parse(serde_json::json!({
            "id": "evt_3",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_3", "amount_total": 200 } }
        }));

        assert!(event.checkout_session().unwrap().identity().is_none());
    }

    #[test]
    fn unknown_event_type_still_parses() {
        let event = parse(serde_json::json!({
            "id": "evt_4",
            "type": "invoice.paid",
            "data": { "object": {} }
        }));

        assert!(!event.is_checkout_completed());
    }

    #[test]
    fn missing_amount_defaults_to_zero() {
        let event = parse(serde_json::json!({
            "id": "evt_5",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_5", "metadata": { "device_id": "d1" } } }
        }));

        assert_eq!(event.checkout_session().unwrap().amount_total, 0);
    }
}
