use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Lifecycle of a payment record.
///
/// `Pending → Paid` happens on verification, `Pending → Failed` out of band.
/// Nothing leaves `Paid`; re-marking a paid record as paid is accepted so a
/// repeated verification replays rather than errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentRecordStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Pending => "Pending",
            PaymentRecordStatus::Paid => "Paid",
            PaymentRecordStatus::Failed => "Failed",
        }
    }

    /// States a record may be in for a move to `next` to be legal.
    pub fn predecessors(next: PaymentRecordStatus) -> &'static [PaymentRecordStatus] {
        use PaymentRecordStatus::*;
        match next {
            Paid => &[Pending, Paid],
            Failed => &[Pending],
            Pending => &[],
        }
    }

    pub fn transition(self, next: PaymentRecordStatus) -> CoreResult<PaymentRecordStatus> {
        use PaymentRecordStatus::*;
        match (self, next) {
            (Pending, Paid) | (Pending, Failed) | (Paid, Paid) => Ok(next),
            (from, to) => Err(CoreError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

impl fmt::Display for PaymentRecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentRecordStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentRecordStatus::Pending),
            "Paid" => Ok(PaymentRecordStatus::Paid),
            "Failed" => Ok(PaymentRecordStatus::Failed),
            other => Err(CoreError::ValidationError(format!(
                "unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// Binds a gateway order to the price computed when it was issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub order_id: String,
    pub user_id: Uuid,
    pub package_id: Uuid,
    /// Written once at order creation, never recomputed.
    pub verified_price: Option<f64>,
    pub status: PaymentRecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn pending(order_id: String, user_id: Uuid, package_id: Uuid, verified_price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_id,
            user_id,
            package_id,
            verified_price: Some(verified_price),
            status: PaymentRecordStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The stored price if it is usable for a booking.
    pub fn authoritative_price(&self) -> Option<f64> {
        self.verified_price
            .filter(|price| price.is_finite() && *price > 0.0)
    }
}

/// Parameters for opening an order with the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub auto_capture: bool,
}

/// The gateway's view of an order, returned to the client untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: Option<String>,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: Option<i64>,
    #[serde(default)]
    pub amount_due: Option<i64>,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attempts: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway rejected the request (status {status:?}): {message}")]
    Provider { status: Option<u16>, message: String },
    #[error("Gateway unreachable: {0}")]
    Transport(String),
    #[error("Unreadable gateway response: {0}")]
    Decode(String),
}

/// External payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open an order for a charge. Network-bound and fallible.
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError>;
}
