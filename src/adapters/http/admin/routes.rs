//! Router for the admin endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{reset, set_credits};
use crate::adapters::http::AppState;

/// Routes mounted under `/api/admin`. All require an admin bearer token.
///
/// - `POST /reset` - delete one row or all rows
/// - `POST /set-credits` - overwrite a row
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reset", post(reset))
        .route("/set-credits", post(set_credits))
}
