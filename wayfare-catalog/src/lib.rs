pub mod models;
pub mod pricing;
pub mod quote;
pub mod repository;

pub use models::{Coupon, Hotel, Package, PricingTier};
pub use pricing::{PriceBreakdown, PricingEngine, PricingError};
pub use quote::{HotelSelection, QuoteRequest, Services};
pub use repository::{CouponRepository, HotelRepository, PackageRepository};
