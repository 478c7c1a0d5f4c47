use std::sync::Arc;
use wayfare_order::{BookingManager, CheckoutService};
use wayfare_store::app_config::RateLimitConfig;
use wayfare_store::RedisClient;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub checkout: Arc<CheckoutService>,
    pub bookings: Arc<BookingManager>,
    /// `None` disables rate limiting.
    pub rate_limiter: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
    pub auth: AuthConfig,
    /// Drop the `error` detail from 5xx bodies.
    pub hide_error_details: bool,
}
