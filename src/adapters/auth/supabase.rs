//! Supabase GoTrue adapter for bearer-token validation.
//!
//! Implements the `SessionValidator` port by calling the Supabase auth
//! endpoint (`GET /auth/v1/user`) with the caller's bearer token. The
//! token is never decoded locally; Supabase is the source of truth for
//! its validity. A 401/403 from the endpoint means the token is invalid
//! or expired; any transport failure or unexpected status maps to
//! `ServiceUnavailable` so callers can distinguish "bad token" from
//! "auth is down".

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::identity::{AuthError, AuthenticatedAccount};
use crate::ports::SessionValidator;

/// Configuration for the Supabase auth adapter.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL (e.g. "https://abc.supabase.co").
    pub project_url: String,
    /// Anon (publishable) API key, sent as the `apikey` header.
    pub anon_key: SecretString,
    /// Per-request timeout. Defaults to 10 seconds.
    pub timeout: Option<Duration>,
}

impl SupabaseConfig {
    pub fn new(project_url: impl Into<String>, anon_key: SecretString) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key,
            timeout: None,
        }
    }

    fn user_endpoint(&self) -> String {
        format!("{}/auth/v1/user", self.project_url.trim_end_matches('/'))
    }
}

/// Shape of the GoTrue user response, reduced to the fields we use.
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Supabase GoTrue session validator.
///
/// Production implementation of `SessionValidator`.
pub struct SupabaseSessionValidator {
    config: SupabaseConfig,
    http_client: reqwest::Client,
}

impl SupabaseSessionValidator {
    pub fn new(config: SupabaseConfig) -> Result<Self, AuthError> {
        let timeout = config.timeout.unwrap_or(Duration::from_secs(10));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("http client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl SessionValidator for SupabaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedAccount, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let response = self
            .http_client
            .get(self.config.user_endpoint())
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("auth endpoint unreachable: {e}");
                AuthError::service_unavailable(format!("auth endpoint unreachable: {e}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            tracing::debug!("token rejected by auth provider");
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            tracing::error!(%status, "auth endpoint returned unexpected status");
            return Err(AuthError::service_unavailable(format!(
                "auth endpoint returned {status}"
            )));
        }

        let user: GoTrueUser = response.json().await.map_err(|e| {
            tracing::error!("auth response unparseable: {e}");
            AuthError::service_unavailable(format!("auth response unparseable: {e}"))
        })?;

        if user.id.trim().is_empty() {
            tracing::warn!("auth response missing user id");
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthenticatedAccount::new(
            user.id,
            user.email.unwrap_or_default(),
        ))
    }
}

impl std::fmt::Debug for SupabaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseSessionValidator")
            .field("project_url", &self.config.project_url)
            .finish_non_exhaustive()
    }
}
