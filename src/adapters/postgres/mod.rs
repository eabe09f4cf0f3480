//! PostgreSQL adapters.

mod ledger_store;

pub use ledger_store::PostgresLedgerStore;
