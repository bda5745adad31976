use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub gateway_base_url: String,
    pub gateway_key_id: String,
    pub gateway_key_secret: String,
    pub payment_currency: String,
    pub gateway_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            gateway_base_url: env::var("PAYMENT_GATEWAY_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("PAYMENT_GATEWAY_BASE_URL not set, using default");
                    "https://api.razorpay.com/v1".to_string()
                }),
            gateway_key_id: env::var("PAYMENT_GATEWAY_KEY_ID")
                .unwrap_or_else(|_| {
                    warn!("PAYMENT_GATEWAY_KEY_ID not set, using empty value");
                    String::new()
                }),
            gateway_key_secret: env::var("PAYMENT_GATEWAY_KEY_SECRET")
                .unwrap_or_else(|_| {
                    warn!("PAYMENT_GATEWAY_KEY_SECRET not set, using empty value");
                    String::new()
                }),
            payment_currency: env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| "INR".to_string()),
            gateway_timeout_secs: env::var("PAYMENT_GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_payments_configured(&self) -> bool {
        !self.gateway_key_id.is_empty() && !self.gateway_key_secret.is_empty()
    }
}
