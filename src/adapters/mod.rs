//! Adapters - implementations of the ports for real infrastructure.

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
