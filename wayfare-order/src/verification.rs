use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;
use wayfare_core::booking::BookingDraft;
use wayfare_core::payment::PaymentRecordStatus;
use wayfare_core::repository::PaymentRecordRepository;
use wayfare_core::signature::verify_signature;

use crate::error::CheckoutError;
use crate::materializer::{BookingMaterializer, Materialized};

/// What the client sends back after completing a payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub user_id: Uuid,
    #[serde(rename = "bookingData")]
    pub booking: BookingDraft,
}

/// Admits a booking only for a correctly signed payment against a known order,
/// at the price stored when that order was issued.
pub struct VerificationGate {
    secret: String,
    payments: Arc<dyn PaymentRecordRepository>,
    materializer: BookingMaterializer,
}

impl VerificationGate {
    pub fn new(
        secret: impl Into<String>,
        payments: Arc<dyn PaymentRecordRepository>,
        materializer: BookingMaterializer,
    ) -> Self {
        Self {
            secret: secret.into(),
            payments,
            materializer,
        }
    }

    /// Verify a payment and persist its booking.
    ///
    /// Booking insert, status update and user link are independent writes.
    /// A retried confirmation for the same order creates another booking.
    pub async fn verify(&self, confirmation: PaymentConfirmation) -> Result<Materialized, CheckoutError> {
        let PaymentConfirmation {
            order_id,
            payment_id,
            signature,
            user_id,
            booking: draft,
        } = confirmation;

        if !verify_signature(&self.secret, &order_id, &payment_id, &signature) {
            warn!(order_id = %order_id, "Payment signature mismatch");
            return Err(CheckoutError::InvalidSignature);
        }

        let record = self
            .payments
            .find_by_order_id(&order_id)
            .await
            .map_err(CheckoutError::repository)?
            .ok_or_else(|| CheckoutError::RecordNotFound(order_id.clone()))?;

        let price = record
            .authoritative_price()
            .ok_or_else(|| CheckoutError::PriceMissing(order_id.clone()))?;

        // Checked before any write so a failed record never gains a booking.
        record.status.transition(PaymentRecordStatus::Paid)?;

        if record.package_id != draft.package_booked {
            warn!(order_id = %order_id, priced = %record.package_id, booked = %draft.package_booked, "Booked package differs from the priced package");
            return Err(CheckoutError::PackageMismatch {
                order_id,
                booked: draft.package_booked,
            });
        }
        if record.user_id != user_id {
            warn!(order_id = %order_id, record_user = %record.user_id, request_user = %user_id, "Confirming user differs from ordering user");
        }

        let booking = self
            .materializer
            .insert(draft, user_id, price, &payment_id)
            .await?;

        match self
            .payments
            .update_status(
                &order_id,
                PaymentRecordStatus::predecessors(PaymentRecordStatus::Paid),
                PaymentRecordStatus::Paid,
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                error!(order_id = %order_id, booking_id = %booking.id, "Booking orphaned; payment record moved off {} before it could be marked Paid", record.status);
                return Err(CheckoutError::StatusChanged(order_id));
            }
            Err(e) => {
                error!(order_id = %order_id, booking_id = %booking.id, "Booking orphaned; payment record left {}: {}", record.status, e);
                return Err(CheckoutError::repository(e));
            }
        }

        let user_linked = self.materializer.link_to_user(&booking).await;
        info!(order_id = %order_id, booking_id = %booking.id, user_linked, "Payment verified");

        Ok(Materialized {
            booking,
            user_linked,
        })
    }
}
