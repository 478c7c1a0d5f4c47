use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use wayfare_catalog::QuoteRequest;
use wayfare_core::booking::Booking;
use wayfare_core::payment::{GatewayOrder, PaymentRecord};
use wayfare_order::PaymentConfirmation;

use crate::error::AppError;
use crate::middleware::admin_auth_middleware;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBody {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub quote: QuoteRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub total_price: f64,
    pub order: GatewayOrder,
    pub package_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Booking,
    pub user_linked: bool,
}

#[derive(Debug, Serialize)]
pub struct PaymentRecordResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: PaymentRecord,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/package/quote", post(quote_package))
        .route("/api/package/verify-payment", post(verify_payment))
}

pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/payment/{order_id}/fail", post(fail_payment))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

async fn quote_package(
    State(state): State<AppState>,
    payload: Result<Json<QuoteBody>, JsonRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let Json(body) = payload?;

    let issued = state
        .checkout
        .quote_and_order(body.user_id, &body.quote)
        .await?;

    Ok(Json(QuoteResponse {
        success: true,
        total_price: issued.total_price,
        order: issued.order,
        package_id: body.quote.package_id,
    }))
}

async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentConfirmation>, JsonRejection>,
) -> Result<(StatusCode, Json<VerifyResponse>), AppError> {
    let Json(confirmation) = payload?;

    let outcome = state.checkout.verify_payment(confirmation).await?;

    Ok((
        StatusCode::CREATED,
        Json(VerifyResponse {
            success: true,
            message: "Payment verified and booking created",
            data: outcome.booking,
            user_linked: outcome.user_linked,
        }),
    ))
}

async fn fail_payment(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentRecordResponse>, AppError> {
    let record = state.bookings.fail_payment(&order_id).await?;
    info!(order_id = %order_id, "Payment marked failed by admin");

    Ok(Json(PaymentRecordResponse {
        success: true,
        message: "Payment marked as failed",
        data: record,
    }))
}
