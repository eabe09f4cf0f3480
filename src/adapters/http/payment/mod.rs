//! Payment endpoints - checkout initiation and the Stripe webhook.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
