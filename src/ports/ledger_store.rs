//! LedgerStore port - durable usage records keyed by identity.
//!
//! The store is the sole source of truth for balances; the service never
//! caches records across requests. Because concurrent handlers race on
//! the same rows, the mutating operations are specified as atomic units:
//!
//! - `consume` performs read-decide-write as one step per identity, so
//!   two concurrent calls can never both spend the last unit.
//! - `top_up` appends the donation audit row and increments credits as
//!   one unit, keyed by the checkout-session id; redelivered events must
//!   come back as `Duplicate` with no ledger change.
//!
//! Implementations must apply the exact free-before-credits ordering of
//! [`crate::domain::ledger::decide`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::identity::Identity;
use crate::domain::ledger::UsageRecord;

/// Outcome of an atomic consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// One unit was spent; holds the post-consumption record.
    Allowed(UsageRecord),
    /// Nothing remained; holds the unchanged record.
    Denied(UsageRecord),
}

impl ConsumeOutcome {
    pub fn record(&self) -> UsageRecord {
        match self {
            ConsumeOutcome::Allowed(r) | ConsumeOutcome::Denied(r) => *r,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, ConsumeOutcome::Allowed(_))
    }
}

/// Outcome of an idempotent top-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopUpOutcome {
    /// Credits were added; holds the post-top-up record.
    Applied(UsageRecord),
    /// This session id was already applied; nothing changed.
    Duplicate,
}

/// Append-only audit row written alongside each applied top-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRecord {
    /// Checkout-session id; unique per applied top-up.
    pub session_id: String,
    /// The credited identity.
    pub identity: Identity,
    /// Charged amount in cents.
    pub amount_cents: i64,
}

/// Storage-layer failures.
///
/// "Not found" is never an error here; an absent row reads as the zero
/// record.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Durable per-identity ledger storage.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Reads the record for an identity; absent rows read as zero.
    async fn get(&self, identity: &Identity) -> Result<UsageRecord, StoreError>;

    /// Atomically spends one unit under the free-before-credits policy.
    async fn consume(
        &self,
        identity: &Identity,
        free_quota: u32,
    ) -> Result<ConsumeOutcome, StoreError>;

    /// Atomically credits `credit_delta` and appends the donation row.
    ///
    /// Applies at most once per `donation.session_id`.
    async fn top_up(
        &self,
        identity: &Identity,
        credit_delta: u32,
        donation: &DonationRecord,
    ) -> Result<TopUpOutcome, StoreError>;

    /// Creates or fully replaces the record (admin override).
    async fn set(&self, identity: &Identity, record: UsageRecord) -> Result<(), StoreError>;

    /// Deletes one identity's record; deleting an absent row is a no-op.
    async fn delete(&self, identity: &Identity) -> Result<(), StoreError>;

    /// Deletes every record (admin clear-all).
    async fn delete_all(&self) -> Result<(), StoreError>;
}
