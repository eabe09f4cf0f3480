//! Request/response DTOs for the admin endpoints.
//!
//! Admin requests name their target explicitly in the body; the bearer
//! token identifies the administrator, never the target. `credits` is
//! accepted as an alias for `donation_credits` on set-credits and wins
//! when both are present and non-zero.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/admin/reset`. Both fields absent means reset all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response for `POST /api/admin/reset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<String>,
}

/// Body for `POST /api/admin/set-credits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetCreditsRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub free_used: u32,
    #[serde(default)]
    pub donation_credits: u32,
    /// Alias for `donation_credits`; takes precedence when non-zero.
    #[serde(default)]
    pub credits: u32,
}

impl SetCreditsRequest {
    /// The credit balance to write, resolving the alias.
    pub fn effective_credits(&self) -> u32 {
        if self.credits != 0 {
            self.credits
        } else {
            self.donation_credits
        }
    }
}

/// Response for `POST /api/admin/set-credits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCreditsResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub free_used: u32,
    pub donation_credits: u32,
}
