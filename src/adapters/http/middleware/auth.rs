//! Authentication middleware and extractors.
//!
//! - `auth_middleware` validates Bearer tokens via the `SessionValidator`
//!   port and injects the account into request extensions
//! - `RequireAuth` rejects with 401 when no account is present
//! - `OptionalAuth` hands back `Option<AuthenticatedAccount>`
//!
//! Requests without an Authorization header pass through untouched, so
//! device-identified endpoints and the signature-verified webhook share
//! the same stack. An invalid token is always a 401, even on routes that
//! would have accepted an anonymous device id: a caller presenting a bad
//! token should hear about it rather than silently degrade.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::identity::{AuthError, AuthenticatedAccount};
use crate::ports::SessionValidator;

/// Auth middleware state - the session validator port.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates Bearer tokens and injects [`AuthenticatedAccount`].
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match validator.validate(token).await {
            Ok(account) => {
                request.extensions_mut().insert(account);
                next.run(request).await
            }
            Err(AuthError::InvalidToken) => {
                tracing::debug!("rejected invalid bearer token");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new("UNAUTHENTICATED", "invalid or expired token")),
                )
                    .into_response()
            }
            Err(AuthError::ServiceUnavailable(msg)) => {
                tracing::error!("auth service unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::new(
                        "AUTH_UNAVAILABLE",
                        "authentication service unavailable",
                    )),
                )
                    .into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires an authenticated account.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedAccount);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedAccount>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor for optional authentication.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedAccount>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let account = parts.extensions.get::<AuthenticatedAccount>().cloned();
            Ok(OptionalAuth(account))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let AuthRejection::Unauthenticated = self;
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHENTICATED", "authentication required")),
        )
            .into_response()
    }
}
