//! Payment capture through a Stripe-style charges API.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::PaymentConfig;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("charge amount must be a positive whole number of currency units")]
    InvalidAmount,
    #[error("payment endpoint returned status {0}")]
    Declined(u16),
    #[error("payment request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Capture `amount` whole currency units. Any non-success outcome is an
    /// error; partial captures do not exist at this interface.
    async fn charge(&self, amount: u64) -> Result<(), PaymentError>;
}

pub struct StripeGateway {
    client: reqwest::Client,
    endpoint: String,
    secret_key: String,
    currency: String,
    source: String,
}

impl StripeGateway {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            secret_key: config.secret_key.clone(),
            currency: config.currency.clone(),
            source: config.source.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn charge(&self, amount: u64) -> Result<(), PaymentError> {
        if amount == 0 {
            return Err(PaymentError::InvalidAmount);
        }

        // the charges API takes the amount in minor units
        let params = [
            ("amount", (amount * 100).to_string()),
            ("currency", self.currency.clone()),
            ("source", self.source.clone()),
        ];

        debug!(amount = amount, currency = %self.currency, "Submitting charge");
        let response = self
            .client
            .post(format!("{}/v1/charges", self.endpoint))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PaymentError::Declined(response.status().as_u16()))
        }
    }
}
