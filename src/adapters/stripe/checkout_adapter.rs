//! Stripe checkout adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe Checkout
//! Sessions API. One-time `payment` mode sessions only; the ledger
//! identity rides along in session metadata so the webhook handler can
//! credit the right row when the session completes.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::identity::Identity;
use crate::ports::{CheckoutRequest, CheckoutSessionLink, PaymentError, PaymentProvider};

/// Stripe API configuration for checkout session creation.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Shape of the checkout session response, reduced to the fields we use.
#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

/// Stripe checkout session provider.
///
/// Production implementation of `PaymentProvider`.
pub struct StripeCheckoutAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeCheckoutAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn session_params(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
        let metadata_key = match &request.identity {
            Identity::Device(_) => "metadata[device_id]",
            Identity::Account(_) => "metadata[user_id]",
        };

        vec![
            ("mode", "payment".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("line_items[0][price_data][currency]", "usd".to_string()),
            (
                "line_items[0][price_data][product_data][name]",
                "Loop credits donation".to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                request.amount_cents.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            (metadata_key, request.identity.as_str().to_string()),
        ]
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckoutAdapter {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSessionLink, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = Self::session_params(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, "Stripe checkout session creation failed");
            return Err(PaymentError::rejected(format!(
                "Stripe API error ({status}): {error_text}"
            )));
        }

        let session: StripeSession = response
            .json()
            .await
            .map_err(|e| PaymentError::rejected(format!("unparseable Stripe response: {e}")))?;

        let url = match session.url {
            Some(url) => url,
            None => {
                tracing::error!(session_id = %session.id, "checkout session missing hosted URL");
                return Err(PaymentError::rejected(
                    "checkout session missing hosted URL",
                ));
            }
        };

        tracing::info!(session_id = %session.id, "checkout session created");
        Ok(CheckoutSessionLink {
            id: session.id,
            url,
        })
    }
}

impl std::fmt::Debug for StripeCheckoutAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeCheckoutAdapter")
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(identity: Identity) -> CheckoutRequest {
        CheckoutRequest {
            identity,
            amount_cents: 700,
            success_url: "http://localhost:5173/?donation=success".to_string(),
            cancel_url: "http://localhost:5173/?donation=cancel".to_string(),
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn config_defaults_to_public_api() {
        let config = StripeConfig::new(SecretString::new("sk_test_x".to_string()));
        assert_eq!(config.api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn config_with_base_url_overrides() {
        let config = StripeConfig::new(SecretString::new("sk_test_x".to_string()))
            .with_base_url("http://localhost:12111");
        assert_eq!(config.api_base_url, "http://localhost:12111");
    }

    #[test]
    fn device_identity_lands_in_device_metadata() {
        let request = request_for(Identity::device("dev-1").unwrap());
        let params = StripeCheckoutAdapter::session_params(&request);

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(param(&params, "metadata[device_id]"), Some("dev-1"));
        assert_eq!(param(&params, "metadata[user_id]"), None);
        assert_eq!(
            param(&params, "line_items[0][price_data][unit_amount]"),
            Some("700")
        );
    }

    #[test]
    fn account_identity_lands_in_user_metadata() {
        let request = request_for(Identity::account("u-1").unwrap());
        let params = StripeCheckoutAdapter::session_params(&request);

        assert_eq!(param(&params, "metadata[user_id]"), Some("u-1"));
        assert_eq!(param(&params, "metadata[device_id]"), None);
    }

    #[test]
    fn session_urls_pass_through() {
        let request = request_for(Identity::device("dev-1").unwrap());
        let params = StripeCheckoutAdapter::session_params(&request);

        assert_eq!(
            param(&params, "success_url"),
            Some("http://localhost:5173/?donation=success")
        );
        assert_eq!(
            param(&params, "cancel_url"),
            Some("http://localhost:5173/?donation=cancel")
        );
        assert_eq!(param(&params, "line_items[0][quantity]"), Some("1"));
    }

    #[test]
    fn session_response_tolerates_missing_url() {
        let session: StripeSession = serde_json::from_str(r#"{"id":"cs_1"}"#).unwrap();
        assert_eq!(session.id, "cs_1");
        assert!(session.url.is_none());
    }
}
