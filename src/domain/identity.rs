//! Identity types - the ledger key for a caller.
//!
//! Every ledger row is keyed by an [`Identity`]: either an anonymous
//! device identifier supplied by the client, or an account identifier
//! taken from a validated bearer token. The two are never unified; an
//! account and a device belonging to the same human carry separate rows.
//!
//! Account identity is authoritative: it is only ever constructed from a
//! token the auth provider has validated, never from a request body.

use thiserror::Error;

/// The ledger key for a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Anonymous device identifier (opaque, caller-supplied).
    Device(String),
    /// Authenticated account identifier (opaque, from a validated token).
    Account(String),
}

impl Identity {
    /// Creates a device identity, rejecting empty identifiers.
    pub fn device(id: impl Into<String>) -> Result<Self, IdentityError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Identity::Device(id))
    }

    /// Creates an account identity, rejecting empty identifiers.
    pub fn account(id: impl Into<String>) -> Result<Self, IdentityError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Identity::Account(id))
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Device(id) | Identity::Account(id) => id,
        }
    }

    pub fn is_account(&self) -> bool {
        matches!(self, Identity::Account(_))
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Device(id) => write!(f, "device:{}", id),
            Identity::Account(id) => write!(f, "account:{}", id),
        }
    }
}

/// Errors constructing an identity.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("identity must not be empty")]
    Empty,
}

/// Account details extracted from a validated bearer token.
///
/// Populated by the `SessionValidator` port; the email is used for the
/// admin allow-list check.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    /// Account identifier at the auth provider.
    pub id: String,
    /// Email address from the token's user profile.
    pub email: String,
}

impl AuthenticatedAccount {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// The ledger identity for this account.
    pub fn identity(&self) -> Identity {
        Identity::Account(self.id.clone())
    }
}

/// Authentication errors during token validation.
///
/// Provider-agnostic: whatever sits behind the `SessionValidator` port
/// maps its failures onto these.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, expired, or has a bad signature.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The auth provider is unreachable or misbehaving.
    #[error("auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
