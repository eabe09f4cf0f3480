//! API error type and JSON error body.
//!
//! Every handler returns `Result<_, ApiError>`; the conversion from
//! `LedgerError` keeps the HTTP status mapping in one place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::LedgerError;

/// JSON error body: `{"error": <message>, "code": <CODE>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

/// API error that converts ledger errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(LedgerError);

impl ApiError {
    pub fn inner(&self) -> &LedgerError {
        &self.0
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            LedgerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            LedgerError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            LedgerError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            LedgerError::StoreUnavailable(_) => (StatusCode::BAD_GATEWAY, "STORE_UNAVAILABLE"),
            LedgerError::SignatureInvalid(_) => (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE"),
            LedgerError::UpstreamPayment(_) => (StatusCode::BAD_REQUEST, "PAYMENT_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        let body = ErrorResponse::new(code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}
