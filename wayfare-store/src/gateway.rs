use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use wayfare_core::payment::{GatewayError, GatewayOrder, OrderRequest, PaymentGateway};

use crate::app_config::GatewayConfig;

/// Razorpay Orders API client.
#[derive(Clone)]
pub struct RazorpayGateway {
    http: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl RazorpayGateway {
    pub fn new(http: Client, cfg: &GatewayConfig) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            key_id: cfg.key_id.clone(),
            key_secret: cfg.key_secret.clone(),
        }
    }

    /// Client with the configured request timeout.
    pub fn from_config(cfg: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self::new(http, cfg))
    }

    fn map_error(status: StatusCode, body: &str) -> GatewayError {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) => match (env.error.code, env.error.description) {
                (Some(code), Some(description)) => format!("{}: {}", code, description),
                (None, Some(description)) => description,
                (Some(code), None) => code,
                (None, None) => body.to_string(),
            },
            Err(_) => body.to_string(),
        };
        GatewayError::Provider {
            status: Some(status.as_u16()),
            message,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let body = CreateOrderBody {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            payment_capture: u8::from(request.auto_capture),
        };

        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), receipt = %request.receipt, "Gateway rejected order");
            return Err(Self::map_error(status, &text));
        }

        debug!(receipt = %request.receipt, "Gateway order response received");
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
