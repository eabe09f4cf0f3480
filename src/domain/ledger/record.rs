//! Usage record and balance types.

use serde::{Deserialize, Serialize};

/// The persisted ledger state for one identity.
///
/// Both fields are unsigned by construction, so a negative balance is
/// unrepresentable. An identity with no stored row is logically the zero
/// record; absence is not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Uses consumed from the free allotment.
    pub free_used: u32,
    /// Paid donation credits remaining.
    pub credits: u32,
}

impl UsageRecord {
    pub fn new(free_used: u32, credits: u32) -> Self {
        Self { free_used, credits }
    }

    /// The record for an identity with no prior activity.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Derived balance view against a free quota.
    pub fn balance(&self, free_quota: u32) -> Balance {
        Balance {
            free_used: self.free_used,
            credits: self.credits,
            free_remaining: free_quota.saturating_sub(self.free_used),
            credits_remaining: self.credits,
        }
    }
}

/// Read-only balance view returned by `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub free_used: u32,
    pub credits: u32,
    /// `max(0, quota - free_used)`, saturating.
    pub free_remaining: u32,
    pub credits_remaining: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_record_has_empty_balance() {
        let balance = UsageRecord::zero().balance(3);
        assert_eq!(balance.free_used, 0);
        assert_eq!(balance.free_remaining, 3);
        assert_eq!(balance.credits_remaining, 0);
    }

    #[test]
    fn balance_saturates_when_free_used_exceeds_quota() {
        // Quota may be lowered by config after rows were written.
        let balance = UsageRecord::new(5, 2).balance(3);
        assert_eq!(balance.free_remaining, 0);
        assert_eq!(balance.credits_remaining, 2);
    }

    #[test]
    fn balance_reflects_partial_consumption() {
        let balance = UsageRecord::new(1, 4).balance(3);
        assert_eq!(balance.free_used, 1);
        assert_eq!(balance.free_remaining, 2);
        assert_eq!(balance.credits, 4);
    }
}
