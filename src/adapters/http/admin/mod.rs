//! Admin endpoints - ledger reset and balance overrides.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
