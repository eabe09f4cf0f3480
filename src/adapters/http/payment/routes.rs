//! Router for the payment endpoints.
//!
//! These keep their original top-level paths rather than nesting under a
//! shared prefix: clients and Stripe's webhook configuration point at
//! them directly.

use axum::routing::post;
use axum::Router;

use super::handlers::{create_checkout_session, stripe_webhook};
use crate::adapters::http::AppState;

/// - `POST /api/create-checkout-session` - start a donation checkout
/// - `POST /api/stripe/webhook` - signature-verified event delivery
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/stripe/webhook", post(stripe_webhook))
}
