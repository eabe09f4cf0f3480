//! Payment domain - Stripe event parsing and webhook verification.

mod event;
mod webhook_errors;
mod webhook_verifier;

pub use event::{CheckoutSession, StripeEvent, CHECKOUT_SESSION_COMPLETED};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_test_payload, SignatureHeader, WebhookVerifier};
