//! Router for the usage endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{check_usage, consume_usage};
use crate::adapters::http::AppState;

/// Routes mounted under `/api/usage`.
///
/// - `POST /check` - read-only balance
/// - `POST /consume` - spend one unit
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check", post(check_usage))
        .route("/consume", post(consume_usage))
}
