use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use wayfare_shared::Masked;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "Booked",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Cancellation is final.
    pub fn transition(self, next: BookingStatus) -> CoreResult<BookingStatus> {
        match (self, next) {
            (BookingStatus::Cancelled, BookingStatus::Booked) => Err(CoreError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
            _ => Ok(next),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Booked" => Ok(BookingStatus::Booked),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::ValidationError(format!("unknown booking status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingPaymentStatus {
    Paid,
    Pending,
    Failed,
}

impl BookingPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingPaymentStatus::Paid => "Paid",
            BookingPaymentStatus::Pending => "Pending",
            BookingPaymentStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for BookingPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingPaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(BookingPaymentStatus::Paid),
            "Pending" => Ok(BookingPaymentStatus::Pending),
            "Failed" => Ok(BookingPaymentStatus::Failed),
            other => Err(CoreError::ValidationError(format!("unknown payment status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetail {
    pub guest_name: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    #[serde(default)]
    pub passport_number: Option<Masked<String>>,
    #[serde(default)]
    pub passport_issued_country: Option<String>,
    #[serde(default)]
    pub passport_issued_date: Option<NaiveDate>,
    #[serde(default)]
    pub passport_date_of_expiry: Option<NaiveDate>,
}

/// Snapshot of a hotel as it was booked; later catalog edits do not touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedHotel {
    #[serde(default)]
    pub hotel_id: Option<Uuid>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub children_age_under5: bool,
    #[serde(default)]
    pub extra_bed: bool,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub hotel_photo_url: Vec<String>,
    #[serde(default)]
    pub hotel_price: Option<f64>,
    #[serde(default)]
    pub hotel_rating: Option<f64>,
    #[serde(default)]
    pub hotel_location: Option<String>,
}

/// The client-supplied part of a booking.
///
/// Carries no price and no status: any such fields in the request body are
/// dropped during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub package_booked: Uuid,
    #[serde(default)]
    pub package_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub package_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_guests: Option<u32>,
    #[serde(default)]
    pub booked_hotels: Vec<BookedHotel>,
    #[serde(default)]
    pub coupon_details: Option<serde_json::Value>,
    #[serde(default)]
    pub guest_details: Vec<GuestDetail>,
    pub contact_number: Masked<String>,
    pub contact_email: Masked<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub gst_address: Option<String>,
    #[serde(default)]
    pub gst_city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_booked: Uuid,
    pub package_start_date: Option<DateTime<Utc>>,
    pub package_end_date: Option<DateTime<Utc>>,
    pub total_guests: Option<u32>,
    pub booked_hotels: Vec<BookedHotel>,
    pub coupon_details: Option<serde_json::Value>,
    pub package_booked_date: DateTime<Utc>,
    /// Copied from the payment record; never derived from request input.
    pub package_booked_price: f64,
    pub guest_details: Vec<GuestDetail>,
    pub package_booked_status: BookingStatus,
    pub package_booked_payment_status: BookingPaymentStatus,
    pub gateway_payment_id: Option<String>,
    pub contact_number: Masked<String>,
    pub contact_email: Masked<String>,
    pub gst_number: Option<String>,
    pub gst_address: Option<String>,
    pub gst_city: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A paid booking built from the client's draft and the server's price.
    pub fn paid(draft: BookingDraft, user_id: Uuid, price: f64, payment_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            package_booked: draft.package_booked,
            package_start_date: draft.package_start_date,
            package_end_date: draft.package_end_date,
            total_guests: draft.total_guests,
            booked_hotels: draft.booked_hotels,
            coupon_details: draft.coupon_details,
            package_booked_date: now,
            package_booked_price: price,
            guest_details: draft.guest_details,
            package_booked_status: BookingStatus::Booked,
            package_booked_payment_status: BookingPaymentStatus::Paid,
            gateway_payment_id: Some(payment_id.to_string()),
            contact_number: draft.contact_number,
            contact_email: draft.contact_email,
            gst_number: draft.gst_number,
            gst_address: draft.gst_address,
            gst_city: draft.gst_city,
            updated_at: now,
        }
    }

    /// Merge an administrative update. The booked price is not updatable, and a
    /// rejected update leaves the booking untouched.
    pub fn apply(&mut self, update: BookingUpdate) -> CoreResult<()> {
        let mut next = self.clone();

        if let Some(status) = update.package_booked_status {
            next.package_booked_status = next.package_booked_status.transition(status)?;
        }
        if let Some(payment_status) = update.package_booked_payment_status {
            next.package_booked_payment_status = payment_status;
        }
        if let Some(start) = update.package_start_date {
            next.package_start_date = Some(start);
        }
        if let Some(end) = update.package_end_date {
            next.package_end_date = Some(end);
        }
        if let Some(guests) = update.total_guests {
            next.total_guests = Some(guests);
        }
        if let Some(hotels) = update.booked_hotels {
            next.booked_hotels = hotels;
        }
        if let Some(guests) = update.guest_details {
            next.guest_details = guests;
        }
        if let Some(number) = update.contact_number {
            next.contact_number = number;
        }
        if let Some(email) = update.contact_email {
            next.contact_email = email;
        }
        if let Some(gst) = update.gst_number {
            next.gst_number = Some(gst);
        }
        if let Some(address) = update.gst_address {
            next.gst_address = Some(address);
        }
        if let Some(city) = update.gst_city {
            next.gst_city = Some(city);
        }

        if let (Some(start), Some(end)) = (next.package_start_date, next.package_end_date) {
            if end < start {
                return Err(CoreError::ValidationError(
                    "packageEndDate must not precede packageStartDate".to_string(),
                ));
            }
        }

        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

/// Partial update accepted by the administrative endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    #[serde(default)]
    pub package_booked_status: Option<BookingStatus>,
    #[serde(default)]
    pub package_booked_payment_status: Option<BookingPaymentStatus>,
    #[serde(default)]
    pub package_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub package_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_guests: Option<u32>,
    #[serde(default)]
    pub booked_hotels: Option<Vec<BookedHotel>>,
    #[serde(default)]
    pub guest_details: Option<Vec<GuestDetail>>,
    #[serde(default)]
    pub contact_number: Option<Masked<String>>,
    #[serde(default)]
    pub contact_email: Option<Masked<String>>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub gst_address: Option<String>,
    #[serde(default)]
    pub gst_city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookingDraft {
        serde_json::from_value(serde_json::json!({
            "packageBooked": "6f1c7a57-3f43-4c55-9f5b-1b0f2d8a9a10",
            "totalGuests": 2,
            "guestDetails": [
                { "guestName": "Asha Rao", "gender": "female", "passportNumber": "Z1234567" }
            ],
            "contactNumber": "+91 90000 00000",
            "contactEmail": "asha@example.com",
            "packageBookedPrice": 1,
            "packageBookedStatus": "Cancelled"
        }))
        .unwrap()
    }

    #[test]
    fn test_paid_booking_ignores_client_price() {
        let booking = Booking::paid(draft(), Uuid::new_v4(), 4000.0, "pay_123");

        assert_eq!(booking.package_booked_price, 4000.0);
        assert_eq!(booking.package_booked_status, BookingStatus::Booked);
        assert_eq!(booking.package_booked_payment_status, BookingPaymentStatus::Paid);
        assert_eq!(booking.gateway_payment_id.as_deref(), Some("pay_123"));
    }

    #[test]
    fn test_guest_pii_is_masked_in_debug() {
        let booking = Booking::paid(draft(), Uuid::new_v4(), 4000.0, "pay_123");
        let debug = format!("{:?}", booking);

        assert!(!debug.contains("Z1234567"));
        assert!(!debug.contains("asha@example.com"));
    }

    #[test]
    fn test_apply_update() {
        let mut booking = Booking::paid(draft(), Uuid::new_v4(), 4000.0, "pay_123");

        booking
            .apply(BookingUpdate {
                package_booked_status: Some(BookingStatus::Cancelled),
                gst_city: Some("Pune".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(booking.package_booked_status, BookingStatus::Cancelled);
        assert_eq!(booking.gst_city.as_deref(), Some("Pune"));
        assert_eq!(booking.package_booked_price, 4000.0);

        let reopen = booking.apply(BookingUpdate {
            package_booked_status: Some(BookingStatus::Booked),
            ..Default::default()
        });
        assert!(matches!(reopen, Err(CoreError::InvalidTransition { .. })));
    }

    #[test]
    fn test_apply_rejects_inverted_dates() {
        let mut booking = Booking::paid(draft(), Uuid::new_v4(), 4000.0, "pay_123");
        let start = Utc::now();

        let result = booking.apply(BookingUpdate {
            package_start_date: Some(start),
            package_end_date: Some(start - chrono::Duration::days(2)),
            ..Default::default()
        });
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }
}
