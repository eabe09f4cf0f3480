//! HTTP handlers for the usage endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use super::dto::{BalanceResponse, ConsumeResponse, UsageRequest};
use crate::adapters::http::{resolve_identity, ApiError, AppState, OptionalAuth};

/// POST /api/usage/check - read-only balance for the caller.
pub async fn check_usage(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    body: Option<Json<UsageRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let identity = resolve_identity(account, request.device_id)?;

    let balance = state.ledger.check(&identity).await?;
    Ok(Json(BalanceResponse::from(balance)))
}

/// POST /api/usage/consume - spend one unit if the balance allows.
///
/// A deny is a 200 with `allowed: false`, not an error; the client
/// decides what an exhausted balance means for it.
pub async fn consume_usage(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    body: Option<Json<UsageRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let identity = resolve_identity(account, request.device_id)?;

    let result = state.ledger.consume(&identity).await?;
    Ok(Json(ConsumeResponse::from(result)))
}
