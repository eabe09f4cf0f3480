//! Payment configuration (Stripe)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Stripe configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (sk_test_... / sk_live_...)
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret (whsec_...)
    pub stripe_webhook_secret: SecretString,

    /// Smallest accepted donation, in cents
    #[serde(default = "default_min_donation_cents")]
    pub min_donation_cents: i64,

    /// Donation amount used when the client sends none, in cents
    #[serde(default = "default_donation_cents")]
    pub default_donation_cents: i64,
}

fn default_min_donation_cents() -> i64 {
    500
}

fn default_donation_cents() -> i64 {
    500
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        let webhook_secret = self.stripe_webhook_secret.expose_secret();
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if self.min_donation_cents < 100 {
            return Err(ValidationError::InvalidMinimumDonation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new("sk_test_xxx".to_string()),
            stripe_webhook_secret: SecretString::new("whsec_xxx".to_string()),
            min_donation_cents: default_min_donation_cents(),
            default_donation_cents: default_donation_cents(),
        }
    }

    #[test]
    fn test_mode_detected() {
        assert!(base_config().is_test_mode());
    }

    #[test]
    fn valid_config_accepted() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn wrong_api_key_prefix_rejected() {
        let mut config = base_config();
        config.stripe_api_key = SecretString::new("pk_test_xxx".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_webhook_secret_prefix_rejected() {
        let mut config = base_config();
        config.stripe_webhook_secret = SecretString::new("secret".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn tiny_minimum_donation_rejected() {
        let mut config = base_config();
        config.min_donation_cents = 50;
        assert!(config.validate().is_err());
    }
}
