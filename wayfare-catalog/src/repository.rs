use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Coupon, Hotel, Package};

/// Read access to packages.
#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn get_package(
        &self,
        id: Uuid,
    ) -> Result<Option<Package>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Read access to hotels.
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn get_hotel(
        &self,
        id: Uuid,
    ) -> Result<Option<Hotel>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Read access to coupons.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    async fn get_coupon(
        &self,
        id: Uuid,
    ) -> Result<Option<Coupon>, Box<dyn std::error::Error + Send + Sync>>;
}
