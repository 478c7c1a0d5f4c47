pub mod auth;
pub mod error_detail;
pub mod rate_limit;

pub use auth::{admin_auth_middleware, AdminClaims};
pub use error_detail::error_detail_middleware;
pub use rate_limit::rate_limit_middleware;
