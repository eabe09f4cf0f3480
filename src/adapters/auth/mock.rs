//! Mock session validator for testing.
//!
//! Implements the `SessionValidator` port without a real auth provider:
//! a map of tokens to accounts, plus an optional forced error for
//! exercising failure paths.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::identity::{AuthError, AuthenticatedAccount};
use crate::ports::SessionValidator;

/// Mock session validator.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedAccount>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to an account.
    pub fn with_account(self, token: impl Into<String>, account: AuthenticatedAccount) -> Self {
        self.tokens.write().unwrap().insert(token.into(), account);
        self
    }

    /// Adds a valid token with a simple test account whose email is
    /// `{id}@test.example.com`.
    pub fn with_test_account(self, token: impl Into<String>, id: impl Into<String>) -> Self {
        let id = id.into();
        let email = format!("{id}@test.example.com");
        self.with_account(token, AuthenticatedAccount::new(id, email))
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, account: AuthenticatedAccount) {
        self.tokens.write().unwrap().insert(token.into(), account);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedAccount, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
