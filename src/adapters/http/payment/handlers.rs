//! HTTP handlers for checkout and the Stripe webhook.

use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use super::dto::{CheckoutSessionRequest, CheckoutSessionResponse, WebhookAck};
use crate::adapters::http::{resolve_identity, ApiError, AppState, OptionalAuth};
use crate::domain::ledger::LedgerError;

/// POST /api/create-checkout-session - start a donation checkout.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    body: Option<Json<CheckoutSessionRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let identity = resolve_identity(account, request.device_id)?;

    let session = state
        .checkout
        .create_session(identity, request.amount_cents)
        .await?;

    Ok(Json(CheckoutSessionResponse { url: session.url }))
}

/// POST /api/stripe/webhook - verified payment event delivery.
///
/// The raw body bytes are what the signature covers, so this handler
/// takes `Bytes` rather than a typed extractor. Anything verified is
/// acknowledged with `{received: true}`, including duplicates and
/// irrelevant events, so Stripe stops redelivering.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::from(LedgerError::SignatureInvalid(
                "missing Stripe-Signature header".to_string(),
            ))
        })?;

    state.webhook.handle(&body, signature).await?;
    Ok(Json(WebhookAck::ok()))
}
