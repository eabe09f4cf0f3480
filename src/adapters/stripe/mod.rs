//! Stripe adapters.

mod checkout_adapter;
mod mock_payment_provider;

pub use checkout_adapter::{StripeCheckoutAdapter, StripeConfig};
pub use mock_payment_provider::MockPaymentProvider;
