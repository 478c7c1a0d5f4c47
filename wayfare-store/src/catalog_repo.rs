use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_catalog::{
    Coupon, CouponRepository, Hotel, HotelRepository, Package, PackageRepository, PricingTier,
};

/// Read side of the catalog: packages, hotels and coupons.
pub struct StoreCatalogRepository {
    pool: PgPool,
}

impl StoreCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    base_price: f64,
    pricing: Json<Vec<PricingTier>>,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Package {
            id: row.id,
            title: row.title,
            description: row.description,
            base_price: row.base_price,
            pricing: row.pricing.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct HotelRow {
    id: Uuid,
    name: String,
    price: f64,
    rating: Option<f64>,
    location: Option<String>,
    hotel_type: Option<String>,
    photo_urls: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: Uuid,
    code: String,
    discount_percentage: f64,
    max_discount: f64,
}

#[async_trait]
impl PackageRepository for StoreCatalogRepository {
    async fn get_package(
        &self,
        id: Uuid,
    ) -> Result<Option<Package>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, PackageRow>(
            "SELECT id, title, description, base_price, pricing FROM packages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Package::from))
    }
}

#[async_trait]
impl HotelRepository for StoreCatalogRepository {
    async fn get_hotel(
        &self,
        id: Uuid,
    ) -> Result<Option<Hotel>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, HotelRow>(
            "SELECT id, name, price, rating, location, hotel_type, photo_urls FROM hotels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Hotel {
            id: r.id,
            name: r.name,
            price: r.price,
            rating: r.rating,
            location: r.location,
            hotel_type: r.hotel_type,
            photo_urls: r.photo_urls,
        }))
    }
}

#[async_trait]
impl CouponRepository for StoreCatalogRepository {
    async fn get_coupon(
        &self,
        id: Uuid,
    ) -> Result<Option<Coupon>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, CouponRow>(
            "SELECT id, code, discount_percentage, max_discount FROM coupons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Coupon {
            id: r.id,
            code: r.code,
            discount_percentage: r.discount_percentage,
            max_discount: r.max_discount,
        }))
    }
}
