use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wayfare_catalog::PricingError;
use wayfare_core::CoreError;
use wayfare_order::CheckoutError;

/// Detail of a 5xx response. The body leaves it out; `error_detail_middleware`
/// puts it back outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError { message: String, detail: String },
    Anyhow(anyhow::Error),
}

impl AppError {
    fn internal(message: &str, detail: impl ToString) -> Self {
        AppError::InternalServerError {
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::InternalServerError { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(detail))
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Some(format!("{:#}", err)),
                )
            }
        };

        let mut response = (
            status,
            Json(json!({
                "success": false,
                "message": message.clone(),
            })),
        )
            .into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(ErrorDetail { message, detail });
        }
        response
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Pricing(PricingError::NotFound(_))
            | CheckoutError::Pricing(PricingError::InvalidSelection(_))
            | CheckoutError::Pricing(PricingError::GuestCountMismatch { .. }) => {
                AppError::ValidationError(err.to_string())
            }
            CheckoutError::Pricing(PricingError::Repository(_)) => {
                AppError::internal("Failed to compute price", err)
            }
            CheckoutError::Gateway(_) => AppError::internal("Failed to create order", err),
            CheckoutError::InvalidSignature | CheckoutError::PackageMismatch { .. } => {
                AppError::ValidationError(err.to_string())
            }
            CheckoutError::StatusChanged(_) => AppError::ConflictError(err.to_string()),
            CheckoutError::RecordNotFound(_) | CheckoutError::BookingNotFound(_) => {
                AppError::NotFoundError(err.to_string())
            }
            CheckoutError::PriceMissing(_) => AppError::internal("Price verification failed", err),
            CheckoutError::Core(CoreError::ValidationError(_)) => AppError::ValidationError(err.to_string()),
            CheckoutError::Core(CoreError::InvalidTransition { .. }) => AppError::ConflictError(err.to_string()),
            CheckoutError::Repository(_) => AppError::internal("Internal Server Error", err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}
