//! Application layer - orchestration of ports and domain policy.

mod checkout;
mod ledger_service;
mod webhook;

pub use checkout::CheckoutHandler;
pub use ledger_service::{AdminPolicy, ConsumeResult, LedgerService, ResetTarget};
pub use webhook::{PaymentWebhookHandler, WebhookOutcome};
