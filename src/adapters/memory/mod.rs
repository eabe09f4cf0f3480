//! In-memory adapters for tests and local development.

mod ledger_store;

pub use ledger_store::InMemoryLedgerStore;
