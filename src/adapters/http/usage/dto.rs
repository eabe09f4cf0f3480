//! Request/response DTOs for the usage endpoints.
//!
//! `donation_credits` is the historical wire name for the paid-credit
//! balance; clients depend on it.

use serde::{Deserialize, Serialize};

use crate::application::ConsumeResult;
use crate::domain::ledger::Balance;

/// Body for check and consume. The whole body is optional for callers
/// that identify via bearer token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageRequest {
    /// Anonymous device identifier; ignored when a bearer token is present.
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Response for `POST /api/usage/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub free_used: u32,
    pub donation_credits: u32,
    pub free_remaining: u32,
    pub credits_remaining: u32,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            free_used: balance.free_used,
            donation_credits: balance.credits,
            free_remaining: balance.free_remaining,
            credits_remaining: balance.credits_remaining,
        }
    }
}

/// Response for `POST /api/usage/consume`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumeResponse {
    pub allowed: bool,
    pub free_used: u32,
    pub donation_credits: u32,
    pub credits_remaining: u32,
}

impl From<ConsumeResult> for ConsumeResponse {
    fn from(result: ConsumeResult) -> Self {
        Self {
            allowed: result.allowed,
            free_used: result.free_used,
            donation_credits: result.credits,
            credits_remaining: result.credits,
        }
    }
}
