//! Ledger error taxonomy.

use thiserror::Error;

/// Errors surfaced by ledger operations.
///
/// Validation errors are produced locally before the store is touched.
/// Store and upstream failures are not retried here; they propagate so
/// the caller (client or Stripe's redelivery) can retry.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Missing or malformed request fields (no identity, bad amount).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operation requires a validated bearer token.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but not in the admin allow-list.
    #[error("admin privileges required")]
    Forbidden,

    /// The persistence layer failed; retryable by the caller.
    #[error("ledger store unavailable: {0}")]
    StoreUnavailable(String),

    /// Webhook signature verification failed.
    #[error("invalid webhook signature: {0}")]
    SignatureInvalid(String),

    /// Checkout session creation failed upstream.
    #[error("payment provider error: {0}")]
    UpstreamPayment(String),
}

impl LedgerError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// True if retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::StoreUnavailable(_))
    }
}
