//! LedgerService - check, consume, and admin override operations.
//!
//! Earlier iterations of this product reimplemented check/consume/admin
//! nearly identically per transport, with drifting constants. This
//! service is the single implementation; transports are thin adapters
//! over it. It holds no mutable state: every operation re-reads the
//! store before deciding, and all injected dependencies are immutable.

use std::sync::Arc;

use crate::config::QuotaConfig;
use crate::domain::identity::{AuthenticatedAccount, Identity};
use crate::domain::ledger::{Balance, LedgerError, UsageRecord};
use crate::ports::{LedgerStore, StoreError};

/// Result of a consume operation, echoed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeResult {
    pub allowed: bool,
    pub free_used: u32,
    pub credits: u32,
}

/// Target of an admin reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetTarget {
    One(Identity),
    All,
}

/// Orchestrates identity, store, and quota policy.
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    quota: QuotaConfig,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>, quota: QuotaConfig) -> Self {
        Self { store, quota }
    }

    pub fn quota(&self) -> QuotaConfig {
        self.quota
    }

    /// Read-only balance for an identity. Never mutates.
    pub async fn check(&self, identity: &Identity) -> Result<Balance, LedgerError> {
        let record = self.store.get(identity).await?;
        Ok(record.balance(self.quota.free_limit))
    }

    /// Spends one unit if the balance allows it.
    ///
    /// The store performs read-decide-write atomically per identity, so
    /// concurrent calls against one remaining unit admit exactly one.
    /// No write occurs on deny.
    pub async fn consume(&self, identity: &Identity) -> Result<ConsumeResult, LedgerError> {
        let outcome = self.store.consume(identity, self.quota.free_limit).await?;
        let record = outcome.record();

        tracing::debug!(
            identity = %identity,
            allowed = outcome.is_allowed(),
            free_used = record.free_used,
            credits = record.credits,
            "consume decided"
        );

        Ok(ConsumeResult {
            allowed: outcome.is_allowed(),
            free_used: record.free_used,
            credits: record.credits,
        })
    }

    /// Deletes one record, or every record.
    pub async fn admin_reset(&self, target: ResetTarget) -> Result<(), LedgerError> {
        match &target {
            ResetTarget::One(identity) => {
                tracing::info!(identity = %identity, "admin reset");
                self.store.delete(identity).await?;
            }
            ResetTarget::All => {
                tracing::warn!("admin reset: clearing all usage records");
                self.store.delete_all().await?;
            }
        }
        Ok(())
    }

    /// Unconditionally overwrites a record. Full replace, not a merge.
    pub async fn admin_set_balance(
        &self,
        identity: &Identity,
        free_used: u32,
        credits: u32,
    ) -> Result<UsageRecord, LedgerError> {
        let record = UsageRecord::new(free_used, credits);
        self.store.set(identity, record).await?;
        tracing::info!(identity = %identity, free_used, credits, "admin set balance");
        Ok(record)
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => LedgerError::StoreUnavailable(msg),
        }
    }
}

/// Admin allow-list check.
///
/// An empty allow-list admits any authenticated user; startup logs a
/// warning when that permissive default is active.
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    allow_list: Vec<String>,
}

impl AdminPolicy {
    pub fn new(allow_list: Vec<String>) -> Self {
        if allow_list.is_empty() {
            tracing::warn!("admin allow-list is empty: any authenticated user is an admin");
        }
        Self { allow_list }
    }

    /// Authorizes an authenticated account for admin operations.
    pub fn authorize(&self, account: &AuthenticatedAccount) -> Result<(), LedgerError> {
        if self.allow_list.is_empty() || self.allow_list.iter().any(|e| e == &account.email) {
            Ok(())
        } else {
            Err(LedgerError::Forbidden)
        }
    }
}
