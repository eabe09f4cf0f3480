//! HTTP adapters - REST API implementation.
//!
//! Thin axum handlers over the application services. Each endpoint group
//! has its own module with dto/handlers/routes; `AppState` carries the
//! shared dependencies and `router` assembles the full API surface.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod error;
pub mod middleware;
pub mod payment;
pub mod usage;

pub use error::{ApiError, ErrorResponse};
pub use middleware::auth::{auth_middleware, OptionalAuth, RequireAuth};

use crate::application::{AdminPolicy, CheckoutHandler, LedgerService, PaymentWebhookHandler};
use crate::domain::identity::{AuthenticatedAccount, Identity};
use crate::domain::ledger::LedgerError;
use crate::ports::SessionValidator;

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub admin_policy: AdminPolicy,
    pub webhook: Arc<PaymentWebhookHandler>,
    pub checkout: Arc<CheckoutHandler>,
    pub validator: Arc<dyn SessionValidator>,
}

/// Assemble the full API router.
///
/// The auth middleware runs on every route; requests without a bearer
/// token pass through untouched, so the webhook and device-identified
/// endpoints keep working while handlers that need an account use the
/// extractors.
pub fn router(state: AppState) -> Router {
    let validator = state.validator.clone();

    Router::new()
        .route("/health", get(health))
        .nest("/api/usage", usage::routes())
        .nest("/api/admin", admin::routes())
        .merge(payment::routes())
        .layer(axum::middleware::from_fn_with_state(validator, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// Resolve the caller's ledger identity.
///
/// A validated bearer token always wins; a caller-supplied `device_id`
/// is the anonymous fallback. Account identity never comes from the
/// request body.
pub(crate) fn resolve_identity(
    account: Option<AuthenticatedAccount>,
    device_id: Option<String>,
) -> Result<Identity, ApiError> {
    if let Some(account) = account {
        return Ok(account.identity());
    }
    match device_id {
        Some(id) => Identity::device(id)
            .map_err(|e| ApiError::from(LedgerError::invalid_request(e.to_string()))),
        None => Err(ApiError::from(LedgerError::invalid_request(
            "device_id or bearer token required",
        ))),
    }
}
