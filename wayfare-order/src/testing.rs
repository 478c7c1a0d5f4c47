//! In-memory stand-ins for the store and the gateway.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;
use wayfare_catalog::{
    Coupon, CouponRepository, Hotel, HotelRepository, Package, PackageRepository, PricingEngine,
    PricingTier,
};
use wayfare_core::booking::{Booking, BookingDraft};
use wayfare_core::payment::{
    GatewayError, GatewayOrder, OrderRequest, PaymentGateway, PaymentRecord, PaymentRecordStatus,
};
use wayfare_core::repository::{BookingRepository, PaymentRecordRepository, UserRepository};

use crate::{BookingMaterializer, CheckoutService, OrderIssuer, VerificationGate};

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub const SECRET: &str = "test_key_secret";

#[derive(Default)]
pub struct MemoryStore {
    pub packages: Mutex<HashMap<Uuid, Package>>,
    pub hotels: Mutex<HashMap<Uuid, Hotel>>,
    pub coupons: Mutex<HashMap<Uuid, Coupon>>,
    pub records: Mutex<HashMap<String, PaymentRecord>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub users: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    pub fail_status_updates: AtomicBool,
    /// Status another writer lands just before the next `update_status`.
    pub interleaved_status: Mutex<Option<PaymentRecordStatus>>,
}

impl MemoryStore {
    pub fn booking_count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    pub fn record(&self, order_id: &str) -> Option<PaymentRecord> {
        self.records.lock().unwrap().get(order_id).cloned()
    }

    pub fn user_history(&self, user_id: Uuid) -> Vec<Uuid> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn get_package(&self, id: Uuid) -> RepoResult<Option<Package>> {
        Ok(self.packages.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn get_hotel(&self, id: Uuid) -> RepoResult<Option<Hotel>> {
        Ok(self.hotels.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl CouponRepository for MemoryStore {
    async fn get_coupon(&self, id: Uuid) -> RepoResult<Option<Coupon>> {
        Ok(self.coupons.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl PaymentRecordRepository for MemoryStore {
    async fn create_record(&self, record: &PaymentRecord) -> RepoResult<()> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.order_id) {
            return Err(format!("duplicate order id {}", record.order_id).into());
        }
        records.insert(record.order_id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> RepoResult<Option<PaymentRecord>> {
        Ok(self.records.lock().unwrap().get(order_id).cloned())
    }

    async fn update_status(
        &self,
        order_id: &str,
        from: &[PaymentRecordStatus],
        status: PaymentRecordStatus,
    ) -> RepoResult<bool> {
        if self.fail_status_updates.load(Ordering::SeqCst) {
            return Err("write concern timeout".into());
        }
        let interleaved = self.interleaved_status.lock().unwrap().take();
        let mut records = self.records.lock().unwrap();
        match records.get_mut(order_id) {
            Some(record) => {
                if let Some(other) = interleaved {
                    record.status = other;
                }
                if !from.contains(&record.status) {
                    return Ok(false);
                }
                record.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, booking: &Booking) -> RepoResult<()> {
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn list_bookings(&self) -> RepoResult<Vec<Booking>> {
        Ok(self.bookings.lock().unwrap().clone())
    }

    async fn update_booking(&self, booking: &Booking) -> RepoResult<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_booking(&self, id: Uuid) -> RepoResult<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok(bookings.len() != before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn append_booking(&self, user_id: Uuid, booking_id: Uuid) -> RepoResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user_id) {
            Some(history) => {
                history.push(booking_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MockGateway {
    requests: Mutex<Vec<OrderRequest>>,
    issued: AtomicUsize,
    fail: bool,
}

impl MockGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(GatewayError::Provider {
                status: Some(400),
                message: "BAD_REQUEST_ERROR".to_string(),
            });
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrder {
            id: format!("order_test{}", n),
            entity: Some("order".to_string()),
            amount: request.amount,
            amount_paid: Some(0),
            amount_due: Some(request.amount),
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: Some("created".to_string()),
            attempts: Some(0),
            created_at: None,
        })
    }
}

pub struct Seeded {
    pub store: Arc<MemoryStore>,
    pub package_id: Uuid,
    pub hotel_id: Uuid,
    pub coupon_id: Uuid,
    pub user_id: Uuid,
}

/// Package at 1000 with a 1800 per-person tier (extra bed 200), a 500 hotel,
/// a 10% coupon capped at 300 and one registered user.
pub fn seeded() -> Seeded {
    let store = Arc::new(MemoryStore::default());
    let package_id = Uuid::new_v4();
    let hotel_id = Uuid::new_v4();
    let coupon_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    store.packages.lock().unwrap().insert(
        package_id,
        Package {
            id: package_id,
            title: "Himalayan Circuit".to_string(),
            description: None,
            base_price: 1000.0,
            pricing: vec![PricingTier {
                guest_count: 2,
                package_type: Some("Standard".to_string()),
                base_price: 1800.0,
                per_person: true,
                extra_person_charge: None,
                extra_bed_charge: 200.0,
                cnb: 0.0,
                cwb: 0.0,
            }],
        },
    );
    store.hotels.lock().unwrap().insert(
        hotel_id,
        Hotel {
            id: hotel_id,
            name: "Pine Crest".to_string(),
            price: 500.0,
            rating: Some(4.0),
            location: Some("Manali".to_string()),
            hotel_type: None,
            photo_urls: vec![],
        },
    );
    store.coupons.lock().unwrap().insert(
        coupon_id,
        Coupon {
            id: coupon_id,
            code: "MOUNTAIN10".to_string(),
            discount_percentage: 10.0,
            max_discount: 300.0,
        },
    );
    store.users.lock().unwrap().insert(user_id, Vec::new());

    Seeded {
        store,
        package_id,
        hotel_id,
        coupon_id,
        user_id,
    }
}

pub fn checkout(store: Arc<MemoryStore>, gateway: Arc<MockGateway>) -> CheckoutService {
    let pricing = PricingEngine::new(store.clone(), store.clone(), store.clone());
    let issuer = OrderIssuer::new(gateway, "INR");
    let gate = VerificationGate::new(
        SECRET,
        store.clone(),
        BookingMaterializer::new(store.clone(), store.clone()),
    );
    CheckoutService::new(pricing, issuer, store, gate)
}

pub fn draft(package_id: Uuid) -> BookingDraft {
    serde_json::from_value(serde_json::json!({
        "packageBooked": package_id,
        "totalGuests": 2,
        "bookedHotels": [{ "hotelName": "Pine Crest", "adults": 1, "rooms": 1, "hotelPrice": 500 }],
        "guestDetails": [
            { "guestName": "Ravi Menon", "gender": "male" },
            { "guestName": "Leela Menon", "gender": "female" }
        ],
        "contactNumber": "+91 98000 11111",
        "contactEmail": "ravi@example.com",
        "packageBookedPrice": 1
    }))
    .unwrap()
}
