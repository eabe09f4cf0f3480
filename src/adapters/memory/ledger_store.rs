//! In-memory LedgerStore.
//!
//! All mutations run under a single async mutex, which trivially gives
//! the atomicity the port demands: consume calls `decide` and writes
//! back without releasing the lock, and top-ups record the session id
//! and increment credits in the same critical section. Suitable for
//! tests and single-process development, not for multi-instance
//! deployments.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::identity::Identity;
use crate::domain::ledger::{decide, UsageRecord};
use crate::ports::{
    ConsumeOutcome, DonationRecord, LedgerStore, StoreError, TopUpOutcome,
};

#[derive(Default)]
struct State {
    records: HashMap<Identity, UsageRecord>,
    /// Applied checkout-session ids (idempotency guard).
    applied_sessions: HashSet<String>,
    /// Append-only donation audit rows.
    donations: Vec<DonationRecord>,
}

/// In-memory implementation of [`LedgerStore`].
#[derive(Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<State>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Donation audit rows recorded so far (test inspection).
    pub async fn donations(&self) -> Vec<DonationRecord> {
        self.state.lock().await.donations.clone()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get(&self, identity: &Identity) -> Result<UsageRecord, StoreError> {
        let state = self.state.lock().await;
        Ok(state.records.get(identity).copied().unwrap_or_default())
    }

    async fn consume(
        &self,
        identity: &Identity,
        free_quota: u32,
    ) -> Result<ConsumeOutcome, StoreError> {
        let mut state = self.state.lock().await;
        let current = state.records.get(identity).copied().unwrap_or_default();
        let decision = decide(current, free_quota);
        if decision.allowed {
            state.records.insert(identity.clone(), decision.next);
            Ok(ConsumeOutcome::Allowed(decision.next))
        } else {
            Ok(ConsumeOutcome::Denied(current))
        }
    }

    async fn top_up(
        &self,
        identity: &Identity,
        credit_delta: u32,
        donation: &DonationRecord,
    ) -> Result<TopUpOutcome, StoreError> {
        let mut state = self.state.lock().await;
        if !state.applied_sessions.insert(donation.session_id.clone()) {
            return Ok(TopUpOutcome::Duplicate);
        }

        let mut record = state.records.get(identity).copied().unwrap_or_default();
        record.credits = record.credits.saturating_add(credit_delta);
        state.records.insert(identity.clone(), record);
        state.donations.push(donation.clone());
        Ok(TopUpOutcome::Applied(record))
    }

    async fn set(&self, identity: &Identity, record: UsageRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.records.insert(identity.clone(), record);
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.records.remove(identity);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str) -> Identity {
        Identity::device(id).unwrap()
    }

    fn donation(session_id: &str, identity: &Identity, amount: i64) -> DonationRecord {
        DonationRecord {
            session_id: session_id.to_string(),
            identity: identity.clone(),
            amount_cents: amount,
        }
    }

    #[tokio::test]
    async fn absent_row_reads_as_zero() {
        let store = InMemoryLedgerStore::new();
        assert_eq!(store.get(&device("d1")).await.unwrap(), UsageRecord::zero());
    }

    #[tokio::test]
    async fn consume_creates_row_on_first_use() {
        let store = InMemoryLedgerStore::new();
        let outcome = store.consume(&device("d1"), 3).await.unwrap();
        assert_eq!(outcome, ConsumeOutcome::Allowed(UsageRecord::new(1, 0)));
    }

    #[tokio::test]
    async fn consume_denies_without_writing() {
        let store = InMemoryLedgerStore::new();
        let id = device("d1");
        store.set(&id, UsageRecord::new(3, 0)).await.unwrap();

        let outcome = store.consume(&id, 3).await.unwrap();
        assert_eq!(outcome, ConsumeOutcome::Denied(UsageRecord::new(3, 0)));
        assert_eq!(store.get(&id).await.unwrap(), UsageRecord::new(3, 0));
    }

    #[tokio::test]
    async fn top_up_is_idempotent_per_session() {
        let store = InMemoryLedgerStore::new();
        let id = device("d1");
        let row = donation("cs_1", &id, 500);

        let first = store.top_up(&id, 10, &row).await.unwrap();
        let second = store.top_up(&id, 10, &row).await.unwrap();

        assert_eq!(first, TopUpOutcome::Applied(UsageRecord::new(0, 10)));
        assert_eq!(second, TopUpOutcome::Duplicate);
        assert_eq!(store.get(&id).await.unwrap().credits, 10);
        assert_eq!(store.donations().await.len(), 1);
    }

    #[tokio::test]
    async fn top_up_interleaved_with_consume_loses_nothing() {
        let store = std::sync::Arc::new(InMemoryLedgerStore::new());
        let id = device("d1");
        store.set(&id, UsageRecord::new(3, 0)).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..10 {
            let store = std::sync::Arc::clone(&store);
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    let row = donation(&format!("cs_{i}"), &id, 50);
                    store.top_up(&id, 1, &row).await.unwrap();
                } else {
                    store.consume(&id, 3).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // 5 top-ups of 1 credit, up to 5 consumes drawing credits only:
        // credits = 5 - allowed_consumes, and the audit has 5 rows.
        let record = store.get(&id).await.unwrap();
        let consumed = 5 - record.credits;
        assert!(consumed <= 5);
        assert_eq!(store.donations().await.len(), 5);
        assert_eq!(record.free_used, 3);
    }

    #[tokio::test]
    async fn delete_and_delete_all() {
        let store = InMemoryLedgerStore::new();
        let a = device("a");
        let b = device("b");
        store.set(&a, UsageRecord::new(1, 1)).await.unwrap();
        store.set(&b, UsageRecord::new(2, 2)).await.unwrap();

        store.delete(&a).await.unwrap();
        assert_eq!(store.get(&a).await.unwrap(), UsageRecord::zero());
        assert_eq!(store.get(&b).await.unwrap(), UsageRecord::new(2, 2));

        store.delete_all().await.unwrap();
        assert_eq!(store.get(&b).await.unwrap(), UsageRecord::zero());
    }

    #[tokio::test]
    async fn delete_absent_row_is_noop() {
        let store = InMemoryLedgerStore::new();
        assert!(store.delete(&device("ghost")).await.is_ok());
    }
}
