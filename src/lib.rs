//! Loop Ledger - Usage metering and credit ledger backend
//!
//! Tracks free-quota consumption and paid donation credits per identity
//! (anonymous device or authenticated account) and reconciles Stripe
//! payment events into credit top-ups.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
