//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application core and the outside world. Adapters implement them.
//!
//! - `LedgerStore` - durable per-identity usage records with atomic
//!   consume and idempotent top-up
//! - `SessionValidator` - bearer token validation at the auth provider
//! - `PaymentProvider` - hosted checkout session creation

mod ledger_store;
mod payment_provider;
mod session_validator;

pub use ledger_store::{ConsumeOutcome, DonationRecord, LedgerStore, StoreError, TopUpOutcome};
pub use payment_provider::{
    CheckoutRequest, CheckoutSessionLink, PaymentError, PaymentProvider,
};
pub use session_validator::SessionValidator;
