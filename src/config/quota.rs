//! Quota and credit policy configuration
//!
//! Earlier iterations of the product re-derived these constants per
//! handler, with values drifting between deployments. They are now
//! configured once and injected everywhere.

use serde::Deserialize;

use super::error::ValidationError;

/// Quota policy configuration
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuotaConfig {
    /// Free uses granted before credits are drawn
    #[serde(default = "default_free_limit")]
    pub free_limit: u32,

    /// Cents of donation per granted credit
    #[serde(default = "default_cents_per_credit")]
    pub cents_per_credit: u32,
}

fn default_free_limit() -> u32 {
    3
}

fn default_cents_per_credit() -> u32 {
    50
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_limit: default_free_limit(),
            cents_per_credit: default_cents_per_credit(),
        }
    }
}

impl QuotaConfig {
    /// Validate quota configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.free_limit == 0 {
            return Err(ValidationError::InvalidFreeQuota);
        }
        if self.cents_per_credit == 0 {
            return Err(ValidationError::InvalidCentsPerCredit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_three_free_and_fifty_cents() {
        let config = QuotaConfig::default();
        assert_eq!(config.free_limit, 3);
        assert_eq!(config.cents_per_credit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_values_rejected() {
        assert!(QuotaConfig {
            free_limit: 0,
            cents_per_credit: 50
        }
        .validate()
        .is_err());
        assert!(QuotaConfig {
            free_limit: 3,
            cents_per_credit: 0
        }
        .validate()
        .is_err());
    }
}
