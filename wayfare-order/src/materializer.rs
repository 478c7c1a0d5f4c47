use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use wayfare_core::booking::{Booking, BookingDraft};
use wayfare_core::repository::{BookingRepository, UserRepository};

use crate::error::CheckoutError;

/// Outcome of persisting a paid booking.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub booking: Booking,
    /// Whether the booking made it into the user's history.
    pub user_linked: bool,
}

/// Turns a verified payment into a durable booking.
pub struct BookingMaterializer {
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingMaterializer {
    pub fn new(bookings: Arc<dyn BookingRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { bookings, users }
    }

    /// Build the booking from the draft and the stored price, then insert it.
    pub async fn insert(
        &self,
        draft: BookingDraft,
        user_id: Uuid,
        price: f64,
        payment_id: &str,
    ) -> Result<Booking, CheckoutError> {
        let booking = Booking::paid(draft, user_id, price, payment_id);
        self.bookings
            .create_booking(&booking)
            .await
            .map_err(CheckoutError::repository)?;

        info!(booking_id = %booking.id, user_id = %user_id, price, "Booking created");
        Ok(booking)
    }

    /// Append the booking to the user's history.
    ///
    /// Failures are reported, not propagated: the booking is already durable
    /// and is not rolled back.
    pub async fn link_to_user(&self, booking: &Booking) -> bool {
        match self.users.append_booking(booking.user_id, booking.id).await {
            Ok(true) => true,
            Ok(false) => {
                warn!(booking_id = %booking.id, user_id = %booking.user_id, "User not found; booking left unlinked");
                false
            }
            Err(e) => {
                warn!(booking_id = %booking.id, user_id = %booking.user_id, "Failed to link booking to user: {}", e);
                false
            }
        }
    }
}
