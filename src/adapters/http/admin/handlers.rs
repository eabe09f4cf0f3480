//! HTTP handlers for the admin endpoints.
//!
//! Every handler authorizes the caller against the admin allow-list
//! before touching the store. Targets come from the request body as
//! opaque identifiers; an admin may reset or overwrite any row.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use super::dto::{ResetRequest, ResetResponse, SetCreditsRequest, SetCreditsResponse};
use crate::adapters::http::{ApiError, AppState, RequireAuth};
use crate::application::ResetTarget;
use crate::domain::identity::Identity;
use crate::domain::ledger::LedgerError;

fn target_identity(
    device_id: &Option<String>,
    user_id: &Option<String>,
) -> Result<Option<Identity>, ApiError> {
    // user_id wins, matching checkout metadata precedence.
    if let Some(id) = user_id {
        let identity = Identity::account(id.clone())
            .map_err(|e| ApiError::from(LedgerError::invalid_request(e.to_string())))?;
        return Ok(Some(identity));
    }
    if let Some(id) = device_id {
        let identity = Identity::device(id.clone())
            .map_err(|e| ApiError::from(LedgerError::invalid_request(e.to_string())))?;
        return Ok(Some(identity));
    }
    Ok(None)
}

/// POST /api/admin/reset - delete one ledger row, or all of them.
pub async fn reset(
    State(state): State<AppState>,
    RequireAuth(admin): RequireAuth,
    body: Option<Json<ResetRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    state.admin_policy.authorize(&admin)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();

    match target_identity(&request.device_id, &request.user_id)? {
        Some(identity) => {
            state.ledger.admin_reset(ResetTarget::One(identity)).await?;
            Ok(Json(ResetResponse {
                ok: true,
                device_id: request.device_id,
                user_id: request.user_id,
                cleared: None,
            }))
        }
        None => {
            state.ledger.admin_reset(ResetTarget::All).await?;
            Ok(Json(ResetResponse {
                ok: true,
                device_id: None,
                user_id: None,
                cleared: Some("all".to_string()),
            }))
        }
    }
}

/// POST /api/admin/set-credits - overwrite a ledger row (full replace).
pub async fn set_credits(
    State(state): State<AppState>,
    RequireAuth(admin): RequireAuth,
    Json(request): Json<SetCreditsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.admin_policy.authorize(&admin)?;

    let identity = target_identity(&request.device_id, &request.user_id)?.ok_or_else(|| {
        ApiError::from(LedgerError::invalid_request("device_id or user_id required"))
    })?;

    let credits = request.effective_credits();
    let record = state
        .ledger
        .admin_set_balance(&identity, request.free_used, credits)
        .await?;

    Ok(Json(SetCreditsResponse {
        ok: true,
        device_id: request.device_id,
        user_id: request.user_id,
        free_used: record.free_used,
        donation_credits: record.credits,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_takes_precedence_over_device_id() {
        let identity =
            target_identity(&Some("d1".to_string()), &Some("u1".to_string()))
                .unwrap()
                .unwrap();
        assert_eq!(identity, Identity::Account("u1".to_string()));
    }

    #[test]
    fn absent_target_is_none() {
        assert!(target_identity(&None, &None).unwrap().is_none());
    }

    #[test]
    fn blank_target_is_rejected() {
        assert!(target_identity(&Some("  ".to_string()), &None).is_err());
    }
}
