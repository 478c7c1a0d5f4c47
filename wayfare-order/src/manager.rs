use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use wayfare_core::booking::{Booking, BookingStatus, BookingUpdate};
use wayfare_core::payment::{PaymentRecord, PaymentRecordStatus};
use wayfare_core::repository::{BookingRepository, PaymentRecordRepository};

use crate::error::CheckoutError;

/// Administrative operations on bookings and payment records.
pub struct BookingManager {
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentRecordRepository>,
}

impl BookingManager {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentRecordRepository>,
    ) -> Self {
        Self { bookings, payments }
    }

    pub async fn list(&self) -> Result<Vec<Booking>, CheckoutError> {
        self.bookings
            .list_bookings()
            .await
            .map_err(CheckoutError::repository)
    }

    pub async fn get(&self, id: Uuid) -> Result<Booking, CheckoutError> {
        self.bookings
            .get_booking(id)
            .await
            .map_err(CheckoutError::repository)?
            .ok_or(CheckoutError::BookingNotFound(id))
    }

    /// Merge `update` into the stored booking and write it back.
    pub async fn update(&self, id: Uuid, update: BookingUpdate) -> Result<Booking, CheckoutError> {
        let mut booking = self.get(id).await?;
        booking.apply(update)?;

        let found = self
            .bookings
            .update_booking(&booking)
            .await
            .map_err(CheckoutError::repository)?;
        if !found {
            return Err(CheckoutError::BookingNotFound(id));
        }

        info!(booking_id = %id, status = %booking.package_booked_status, "Booking updated");
        Ok(booking)
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Booking, CheckoutError> {
        self.update(
            id,
            BookingUpdate {
                package_booked_status: Some(BookingStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
    }

    /// Hard delete; there is no recovery.
    pub async fn delete(&self, id: Uuid) -> Result<(), CheckoutError> {
        let deleted = self
            .bookings
            .delete_booking(id)
            .await
            .map_err(CheckoutError::repository)?;
        if !deleted {
            return Err(CheckoutError::BookingNotFound(id));
        }

        info!(booking_id = %id, "Booking deleted");
        Ok(())
    }

    /// Out-of-band `Pending → Failed`. A paid record cannot be failed.
    pub async fn fail_payment(&self, order_id: &str) -> Result<PaymentRecord, CheckoutError> {
        let mut record = self
            .payments
            .find_by_order_id(order_id)
            .await
            .map_err(CheckoutError::repository)?
            .ok_or_else(|| CheckoutError::RecordNotFound(order_id.to_string()))?;

        record.status = record.status.transition(PaymentRecordStatus::Failed)?;

        let applied = self
            .payments
            .update_status(
                order_id,
                PaymentRecordStatus::predecessors(PaymentRecordStatus::Failed),
                record.status,
            )
            .await
            .map_err(CheckoutError::repository)?;
        if !applied {
            return Err(CheckoutError::StatusChanged(order_id.to_string()));
        }

        info!(order_id = %order_id, "Payment record marked failed");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{draft, seeded, Seeded};
    use wayfare_core::booking::BookingPaymentStatus;
    use wayfare_core::CoreError;

    fn manager(fixture: &Seeded) -> BookingManager {
        BookingManager::new(fixture.store.clone(), fixture.store.clone())
    }

    fn stored_booking(fixture: &Seeded) -> Booking {
        let booking = Booking::paid(draft(fixture.package_id), fixture.user_id, 4000.0, "pay_1");
        fixture.store.bookings.lock().unwrap().push(booking.clone());
        booking
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let fixture = seeded();
        let manager = manager(&fixture);
        assert!(manager.list().await.unwrap().is_empty());

        let booking = stored_booking(&fixture);

        assert_eq!(manager.list().await.unwrap().len(), 1);
        assert_eq!(manager.get(booking.id).await.unwrap().id, booking.id);

        let missing = Uuid::new_v4();
        assert!(matches!(
            manager.get(missing).await,
            Err(CheckoutError::BookingNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_update_persists_and_keeps_price() {
        let fixture = seeded();
        let manager = manager(&fixture);
        let booking = stored_booking(&fixture);

        let updated = manager
            .update(
                booking.id,
                BookingUpdate {
                    package_booked_payment_status: Some(BookingPaymentStatus::Pending),
                    gst_number: Some("27AAPFU0939F1ZV".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.package_booked_price, 4000.0);
        let stored = manager.get(booking.id).await.unwrap();
        assert_eq!(stored.gst_number.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(stored.package_booked_payment_status, BookingPaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_cancel_is_final() {
        let fixture = seeded();
        let manager = manager(&fixture);
        let booking = stored_booking(&fixture);

        let cancelled = manager.cancel(booking.id).await.unwrap();
        assert_eq!(cancelled.package_booked_status, BookingStatus::Cancelled);

        let reopen = manager
            .update(
                booking.id,
                BookingUpdate {
                    package_booked_status: Some(BookingStatus::Booked),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(reopen, Err(CheckoutError::Core(CoreError::InvalidTransition { .. }))));
        assert_eq!(
            manager.get(booking.id).await.unwrap().package_booked_status,
            BookingStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let fixture = seeded();
        let manager = manager(&fixture);
        let booking = stored_booking(&fixture);

        manager.delete(booking.id).await.unwrap();
        assert_eq!(fixture.store.booking_count(), 0);
        assert!(matches!(
            manager.delete(booking.id).await,
            Err(CheckoutError::BookingNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fail_payment() {
        let fixture = seeded();
        let manager = manager(&fixture);
        for (order_id, status) in [
            ("order_pending", PaymentRecordStatus::Pending),
            ("order_paid", PaymentRecordStatus::Paid),
        ] {
            let mut record = PaymentRecord::pending(order_id.to_string(), fixture.user_id, fixture.package_id, 4000.0);
            record.status = status;
            fixture.store.records.lock().unwrap().insert(order_id.to_string(), record);
        }

        let failed = manager.fail_payment("order_pending").await.unwrap();
        assert_eq!(failed.status, PaymentRecordStatus::Failed);
        assert_eq!(
            fixture.store.record("order_pending").unwrap().status,
            PaymentRecordStatus::Failed
        );

        assert!(matches!(
            manager.fail_payment("order_paid").await,
            Err(CheckoutError::Core(CoreError::InvalidTransition { .. }))
        ));
        assert!(matches!(
            manager.fail_payment("order_unknown").await,
            Err(CheckoutError::RecordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fail_payment_never_overwrites_paid() {
        let fixture = seeded();
        let manager = manager(&fixture);
        let record = PaymentRecord::pending("order_racing".to_string(), fixture.user_id, fixture.package_id, 4000.0);
        fixture.store.records.lock().unwrap().insert("order_racing".to_string(), record);
        *fixture.store.interleaved_status.lock().unwrap() = Some(PaymentRecordStatus::Paid);

        let err = manager.fail_payment("order_racing").await.unwrap_err();

        assert!(matches!(err, CheckoutError::StatusChanged(id) if id == "order_racing"));
        assert_eq!(
            fixture.store.record("order_racing").unwrap().status,
            PaymentRecordStatus::Paid
        );
    }
}
