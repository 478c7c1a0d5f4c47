use uuid::Uuid;
use wayfare_catalog::PricingError;
use wayfare_core::payment::GatewayError;
use wayfare_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Failed to create order: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("Payment record not found for order {0}")]
    RecordNotFound(String),

    #[error("Price verification failed for order {0}")]
    PriceMissing(String),

    #[error("Booked package {booked} was not priced for order {order_id}")]
    PackageMismatch { order_id: String, booked: Uuid },

    #[error("Payment record for order {0} changed status concurrently")]
    StatusChanged(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage failure: {0}")]
    Repository(String),
}

impl CheckoutError {
    pub(crate) fn repository(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CheckoutError::Repository(err.to_string())
    }
}
