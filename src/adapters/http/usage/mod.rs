//! Usage endpoints - balance check and unit consumption.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
