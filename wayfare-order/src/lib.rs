pub mod checkout;
pub mod error;
pub mod issuer;
pub mod manager;
pub mod materializer;
pub mod verification;

#[cfg(test)]
mod testing;

pub use checkout::{CheckoutService, IssuedQuote};
pub use error::CheckoutError;
pub use issuer::OrderIssuer;
pub use manager::BookingManager;
pub use materializer::{BookingMaterializer, Materialized};
pub use verification::{PaymentConfirmation, VerificationGate};
