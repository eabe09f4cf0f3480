//! PostgreSQL implementation of LedgerStore.
//!
//! Device and account ledgers live in separate tables (`device_usage`
//! keyed by `device_id`, `user_credits` keyed by `user_id`) with
//! identical column shapes; donations are an append-only table with a
//! primary key on the checkout-session id.
//!
//! Atomicity:
//! - `consume` is a single conditional UPDATE whose CASE arms encode the
//!   same free-before-credits ordering as `domain::ledger::decide`; the
//!   row lock makes concurrent consumes serialize, and a zero-row result
//!   means denied.
//! - `top_up` runs in one transaction: `INSERT ... ON CONFLICT DO
//!   NOTHING` on the donations primary key detects redelivery, and the
//!   credit increment is relative, so it cannot clobber a concurrent
//!   consume.
//! - `CHECK (>= 0)` constraints in the migration back-stop the policy.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::identity::Identity;
use crate::domain::ledger::UsageRecord;
use crate::ports::{
    ConsumeOutcome, DonationRecord, LedgerStore, StoreError, TopUpOutcome,
};

/// PostgreSQL implementation of the [`LedgerStore`] port.
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Table and key column for an identity's ledger rows.
fn table_for(identity: &Identity) -> (&'static str, &'static str) {
    match identity {
        Identity::Device(_) => ("device_usage", "device_id"),
        Identity::Account(_) => ("user_credits", "user_id"),
    }
}

fn record_from_row(row: &PgRow) -> Result<UsageRecord, StoreError> {
    let free_used: i32 = row.try_get("free_used").map_err(db_err)?;
    let credits: i32 = row.try_get("credits").map_err(db_err)?;
    Ok(UsageRecord::new(
        u32::try_from(free_used).unwrap_or(0),
        u32::try_from(credits).unwrap_or(0),
    ))
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn get(&self, identity: &Identity) -> Result<UsageRecord, StoreError> {
        let (table, key) = table_for(identity);
        let sql = format!("SELECT free_used, credits FROM {table} WHERE {key} = $1");

        let row = sqlx::query(&sql)
            .bind(identity.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => record_from_row(&row),
            None => Ok(UsageRecord::zero()),
        }
    }

    async fn consume(
        &self,
        identity: &Identity,
        free_quota: u32,
    ) -> Result<ConsumeOutcome, StoreError> {
        let (table, key) = table_for(identity);
        let quota = i32::try_from(free_quota).unwrap_or(i32::MAX);

        // Ensure the row exists so the conditional UPDATE has something
        // to lock; a racing insert is absorbed by DO NOTHING.
        let ensure = format!(
            "INSERT INTO {table} ({key}, free_used, credits) VALUES ($1, 0, 0) \
             ON CONFLICT ({key}) DO NOTHING"
        );
        sqlx::query(&ensure)
            .bind(identity.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        // Mirrors domain::ledger::decide: free quota first, then credits.
        let update = format!(
            "UPDATE {table} SET \
               free_used = CASE WHEN free_used < $2 THEN free_used + 1 ELSE free_used END, \
               credits   = CASE WHEN free_used < $2 THEN credits ELSE credits - 1 END, \
               updated_at = now() \
             WHERE {key} = $1 AND (free_used < $2 OR credits > 0) \
             RETURNING free_used, credits"
        );
        let row = sqlx::query(&update)
            .bind(identity.as_str())
            .bind(quota)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Ok(ConsumeOutcome::Allowed(record_from_row(&row)?)),
            None => {
                let current = self.get(identity).await?;
                Ok(ConsumeOutcome::Denied(current))
            }
        }
    }

    async fn top_up(
        &self,
        identity: &Identity,
        credit_delta: u32,
        donation: &DonationRecord,
    ) -> Result<TopUpOutcome, StoreError> {
        let (table, key) = table_for(identity);
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let (device_id, user_id) = match &donation.identity {
            Identity::Device(id) => (Some(id.as_str()), None),
            Identity::Account(id) => (None, Some(id.as_str())),
        };

        // Primary key on stripe_session_id is the idempotency guard.
        let inserted = sqlx::query(
            "INSERT INTO donations (stripe_session_id, device_id, user_id, amount_cents) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (stripe_session_id) DO NOTHING",
        )
        .bind(&donation.session_id)
        .bind(device_id)
        .bind(user_id)
        .bind(donation.amount_cents)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            return Ok(TopUpOutcome::Duplicate);
        }

        let upsert = format!(
            "INSERT INTO {table} ({key}, free_used, credits) VALUES ($1, 0, $2) \
             ON CONFLICT ({key}) DO UPDATE \
               SET credits = {table}.credits + $2, updated_at = now() \
             RETURNING free_used, credits"
        );
        let row = sqlx::query(&upsert)
            .bind(identity.as_str())
            .bind(i32::try_from(credit_delta).unwrap_or(i32::MAX))
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
        let record = record_from_row(&row)?;

        tx.commit().await.map_err(db_err)?;
        Ok(TopUpOutcome::Applied(record))
    }

    async fn set(&self, identity: &Identity, record: UsageRecord) -> Result<(), StoreError> {
        let (table, key) = table_for(identity);
        let sql = format!(
            "INSERT INTO {table} ({key}, free_used, credits) VALUES ($1, $2, $3) \
             ON CONFLICT ({key}) DO UPDATE \
               SET free_used = $2, credits = $3, updated_at = now()"
        );

        sqlx::query(&sql)
            .bind(identity.as_str())
            .bind(i32::try_from(record.free_used).unwrap_or(i32::MAX))
            .bind(i32::try_from(record.credits).unwrap_or(i32::MAX))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> Result<(), StoreError> {
        let (table, key) = table_for(identity);
        let sql = format!("DELETE FROM {table} WHERE {key} = $1");

        sqlx::query(&sql)
            .bind(identity.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("DELETE FROM device_usage")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        sqlx::query("DELETE FROM user_credits")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_kinds_map_to_their_tables() {
        let device = Identity::device("d1").unwrap();
        let account = Identity::account("u1").unwrap();
        assert_eq!(table_for(&device), ("device_usage", "device_id"));
        assert_eq!(table_for(&account), ("user_credits", "user_id"));
    }
}
