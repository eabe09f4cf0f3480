//! Request/response DTOs for the payment endpoints.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionRequest {
    /// Anonymous device identifier; ignored when a bearer token is present.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Donation amount in cents; clamped to the configured minimum.
    #[serde(default)]
    pub amount_cents: Option<i64>,
}

/// Response for `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    /// Hosted payment page URL to redirect the client to.
    pub url: String,
}

/// Response for `POST /api/stripe/webhook`. Always `{received: true}` on
/// any acknowledged delivery, applied or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { received: true }
    }
}
