pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;
pub mod gateway;
pub mod payment_repo;
pub mod redis_repo;

pub use booking_repo::{StoreBookingRepository, StoreUserRepository};
pub use catalog_repo::StoreCatalogRepository;
pub use database::DbClient;
pub use gateway::RazorpayGateway;
pub use payment_repo::StorePaymentRecordRepository;
pub use redis_repo::RedisClient;
