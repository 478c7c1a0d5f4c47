use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_core::booking::{BookedHotel, Booking, GuestDetail};
use wayfare_core::repository::{BookingRepository, UserRepository};
use wayfare_shared::Masked;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = r#"
    id, user_id, package_booked, package_start_date, package_end_date, total_guests,
    booked_hotels, coupon_details, package_booked_date, package_booked_price, guest_details,
    package_booked_status, package_booked_payment_status, gateway_payment_id,
    contact_number, contact_email, gst_number, gst_address, gst_city, updated_at
"#;

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    package_booked: Uuid,
    package_start_date: Option<DateTime<Utc>>,
    package_end_date: Option<DateTime<Utc>>,
    total_guests: Option<i32>,
    booked_hotels: Json<Vec<BookedHotel>>,
    coupon_details: Option<Json<Value>>,
    package_booked_date: DateTime<Utc>,
    package_booked_price: f64,
    guest_details: Json<Vec<GuestDetail>>,
    package_booked_status: String,
    package_booked_payment_status: String,
    gateway_payment_id: Option<String>,
    contact_number: String,
    contact_email: String,
    gst_number: Option<String>,
    gst_address: Option<String>,
    gst_city: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = wayfare_core::CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            package_booked: row.package_booked,
            package_start_date: row.package_start_date,
            package_end_date: row.package_end_date,
            total_guests: row.total_guests.and_then(|g| u32::try_from(g).ok()),
            booked_hotels: row.booked_hotels.0,
            coupon_details: row.coupon_details.map(|c| c.0),
            package_booked_date: row.package_booked_date,
            package_booked_price: row.package_booked_price,
            guest_details: row.guest_details.0,
            package_booked_status: row.package_booked_status.parse()?,
            package_booked_payment_status: row.package_booked_payment_status.parse()?,
            gateway_payment_id: row.gateway_payment_id,
            contact_number: Masked(row.contact_number),
            contact_email: Masked(row.contact_email),
            gst_number: row.gst_number,
            gst_address: row.gst_address,
            gst_city: row.gst_city,
            updated_at: row.updated_at,
        })
    }
}

fn guests_column(booking: &Booking) -> Option<i32> {
    booking.total_guests.and_then(|g| i32::try_from(g).ok())
}

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, package_booked, package_start_date, package_end_date, total_guests,
                booked_hotels, coupon_details, package_booked_date, package_booked_price, guest_details,
                package_booked_status, package_booked_payment_status, gateway_payment_id,
                contact_number, contact_email, gst_number, gst_address, gst_city, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.package_booked)
        .bind(booking.package_start_date)
        .bind(booking.package_end_date)
        .bind(guests_column(booking))
        .bind(Json(&booking.booked_hotels))
        .bind(booking.coupon_details.as_ref().map(Json))
        .bind(booking.package_booked_date)
        .bind(booking.package_booked_price)
        .bind(Json(&booking.guest_details))
        .bind(booking.package_booked_status.as_str())
        .bind(booking.package_booked_payment_status.as_str())
        .bind(&booking.gateway_payment_id)
        .bind(booking.contact_number.expose())
        .bind(booking.contact_email.expose())
        .bind(&booking.gst_number)
        .bind(&booking.gst_address)
        .bind(&booking.gst_city)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Booking::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!(
            "SELECT {} FROM bookings ORDER BY package_booked_date DESC",
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut bookings: Vec<Booking> = Vec::with_capacity(rows.len());
        for row in rows {
            bookings.push(Booking::try_from(row)?);
        }
        Ok(bookings)
    }

    async fn update_booking(
        &self,
        booking: &Booking,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        // package_booked_price is never rewritten.
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                package_start_date = $2,
                package_end_date = $3,
                total_guests = $4,
                booked_hotels = $5,
                guest_details = $6,
                package_booked_status = $7,
                package_booked_payment_status = $8,
                contact_number = $9,
                contact_email = $10,
                gst_number = $11,
                gst_address = $12,
                gst_city = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(booking.id)
        .bind(booking.package_start_date)
        .bind(booking.package_end_date)
        .bind(guests_column(booking))
        .bind(Json(&booking.booked_hotels))
        .bind(Json(&booking.guest_details))
        .bind(booking.package_booked_status.as_str())
        .bind(booking.package_booked_payment_status.as_str())
        .bind(booking.contact_number.expose())
        .bind(booking.contact_email.expose())
        .bind(&booking.gst_number)
        .bind(&booking.gst_address)
        .bind(&booking.gst_city)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_booking(
        &self,
        id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct StoreUserRepository {
    pool: PgPool,
}

impl StoreUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn append_booking(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query(
            "UPDATE users SET booking_details = array_append(booking_details, $2) WHERE id = $1",
        )
        .bind(user_id)
        .bind(booking_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
