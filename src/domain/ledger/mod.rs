//! Ledger domain - usage records, quota policy, error taxonomy.

mod errors;
mod policy;
mod record;

pub use errors::LedgerError;
pub use policy::{credits_for_amount, decide, QuotaDecision};
pub use record::{Balance, UsageRecord};
