//! SessionValidator port - bearer token validation.

use async_trait::async_trait;

use crate::domain::identity::{AuthenticatedAccount, AuthError};

/// Validates a bearer token against the auth provider.
///
/// # Contract
///
/// - Return the account for a valid token
/// - Return `AuthError::InvalidToken` for a bad, expired or unknown token
/// - Return `AuthError::ServiceUnavailable` for transient provider errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedAccount, AuthError>;
}
