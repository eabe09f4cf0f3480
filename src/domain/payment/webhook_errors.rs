//! Webhook verification error types.

use thiserror::Error;

/// Errors produced while verifying and parsing a webhook delivery.
///
/// All of these reject the delivery with no side effects; only a
/// verified, parsed event reaches the reconciler.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// The computed HMAC did not match the supplied signature.
    #[error("webhook signature mismatch")]
    InvalidSignature,

    /// The signed timestamp is older than the replay window.
    #[error("webhook timestamp too old")]
    TimestampOutOfRange,

    /// The signed timestamp is too far in the future.
    #[error("webhook timestamp in the future")]
    InvalidTimestamp,

    /// The signature header or JSON payload could not be parsed.
    #[error("webhook parse error: {0}")]
    ParseError(String),
}

impl WebhookError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError(message.into())
    }
}
