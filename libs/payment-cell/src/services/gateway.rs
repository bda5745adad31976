// libs/payment-cell/src/services/gateway.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{GatewayOrderRequest, PaymentError};

/// Opaque order-creation capability of the external payment gateway. The
/// gateway's own signing and checkout internals stay behind this seam.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway order and return its opaque order identifier.
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<String, PaymentError>;
}

/// HTTP client for the real gateway. Requests carry a bounded timeout so a
/// stalled gateway fails fast as `GatewayUnavailable` instead of hanging
/// the booking flow.
pub struct HttpPaymentGateway {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl HttpPaymentGateway {
    pub fn new(config: &AppConfig) -> Self {
        let client = match Client::builder()
            .timeout(Duration::from_secs(config.gateway_timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!(
                    "Failed to build gateway HTTP client with {}s timeout, \
                     falling back to the default client: {}",
                    config.gateway_timeout_secs, e
                );
                Client::new()
            }
        };

        Self {
            client,
            base_url: config.gateway_base_url.clone(),
            key_id: config.gateway_key_id.clone(),
            key_secret: config.gateway_key_secret.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<String, PaymentError> {
        let url = format!("{}/orders", self.base_url);
        debug!("Creating gateway order at {} for receipt {}", url, request.receipt);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gateway order request failed: {}", e);
                PaymentError::GatewayUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gateway error ({}): {}", status, error_text);
            return Err(PaymentError::GatewayUnavailable);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| PaymentError::GatewayUnavailable)?;

        body.get("id")
            .and_then(|v| v.as_str())
            .map(|id| id.to_string())
            .ok_or(PaymentError::GatewayUnavailable)
    }
}
