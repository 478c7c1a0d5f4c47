use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::Booking;
use crate::payment::{PaymentRecord, PaymentRecordStatus};

/// Ledger of gateway orders and the prices they were issued for.
#[async_trait]
pub trait PaymentRecordRepository: Send + Sync {
    async fn create_record(
        &self,
        record: &PaymentRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<PaymentRecord>, Box<dyn std::error::Error + Send + Sync>>;

    /// Compare-and-set status write: applied only while the stored status is
    /// one of `from`. Returns false when no record matched both.
    async fn update_status(
        &self,
        order_id: &str,
        from: &[PaymentRecordStatus],
        status: PaymentRecordStatus,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Durable bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    /// Overwrite a booking with an already-merged copy. Returns false when absent.
    async fn update_booking(
        &self,
        booking: &Booking,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Hard delete. Returns false when absent.
    async fn delete_booking(
        &self,
        id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// The slice of user accounts the booking flow writes to.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Append to the user's booking history without validating the rest of
    /// the account. Returns false when the user does not exist.
    async fn append_booking(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
