//! Mock payment provider for testing.
//!
//! Records every checkout request and hands back deterministic session
//! links, so tests can assert on what would have been sent to Stripe
//! without any network traffic.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{CheckoutRequest, CheckoutSessionLink, PaymentError, PaymentProvider};

/// Mock implementation of [`PaymentProvider`].
#[derive(Debug, Default)]
pub struct MockPaymentProvider {
    requests: Mutex<Vec<CheckoutRequest>>,
    force_error: Mutex<Option<PaymentError>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces every session creation to fail with the given error.
    pub fn with_error(self, error: PaymentError) -> Self {
        *self.force_error.lock().unwrap() = Some(error);
        self
    }

    /// Checkout requests received so far.
    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSessionLink, PaymentError> {
        if let Some(error) = self.force_error.lock().unwrap().clone() {
            return Err(error);
        }

        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let n = requests.len();
        Ok(CheckoutSessionLink {
            id: format!("cs_test_{n}"),
            url: format!("https://checkout.stripe.test/c/pay/cs_test_{n}"),
        })
    }
}
