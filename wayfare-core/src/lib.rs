pub mod booking;
pub mod payment;
pub mod repository;
pub mod signature;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
