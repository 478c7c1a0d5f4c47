use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;
use wayfare_core::payment::{GatewayError, GatewayOrder, OrderRequest, PaymentGateway};
use wayfare_shared::to_minor_units;

/// Opens gateway orders for authoritative totals.
pub struct OrderIssuer {
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl OrderIssuer {
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Create an auto-capturing order for `amount` (major units).
    pub async fn create_order(&self, amount: f64) -> Result<GatewayOrder, GatewayError> {
        let request = OrderRequest {
            amount: to_minor_units(amount),
            currency: self.currency.clone(),
            receipt: format!("rcpt_{}", Uuid::new_v4().simple()),
            auto_capture: true,
        };

        match self.gateway.create_order(&request).await {
            Ok(order) => {
                info!(order_id = %order.id, amount = request.amount, currency = %request.currency, "Gateway order created");
                Ok(order)
            }
            Err(e) => {
                error!(amount = request.amount, "Error creating gateway order: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;

    #[tokio::test]
    async fn test_amount_is_sent_in_minor_units() {
        let gateway = Arc::new(MockGateway::default());
        let issuer = OrderIssuer::new(gateway.clone(), "INR");

        let order = issuer.create_order(4000.5).await.unwrap();

        assert_eq!(order.amount, 400_050);
        let sent = gateway.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].currency, "INR");
        assert!(sent[0].auto_capture);
        assert!(sent[0].receipt.starts_with("rcpt_"));
        assert!(sent[0].receipt.len() <= 40);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_surfaced() {
        let gateway = Arc::new(MockGateway::failing());
        let issuer = OrderIssuer::new(gateway, "INR");

        let err = issuer.create_order(100.0).await.unwrap_err();
        assert!(matches!(err, GatewayError::Provider { .. }));
    }
}
