use axum::{
    extract::{rejection::JsonRejection, Path, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use wayfare_core::booking::{Booking, BookingUpdate};

use crate::error::AppError;
use crate::middleware::admin_auth_middleware;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> BookingEnvelope<T> {
    fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data,
        })
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/booking", get(list_bookings))
        .route(
            "/api/booking/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/api/booking/{id}/cancel", post(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<BookingEnvelope<Vec<Booking>>>, AppError> {
    let bookings = state.bookings.list().await?;
    if bookings.is_empty() {
        return Err(AppError::NotFoundError("No bookings found".to_string()));
    }
    Ok(BookingEnvelope::data(bookings))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingEnvelope<Booking>>, AppError> {
    Ok(BookingEnvelope::data(state.bookings.get(id).await?))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<BookingUpdate>, JsonRejection>,
) -> Result<Json<BookingEnvelope<Booking>>, AppError> {
    let Json(update) = payload?;
    Ok(BookingEnvelope::data(state.bookings.update(id, update).await?))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingEnvelope<Booking>>, AppError> {
    let booking = state.bookings.cancel(id).await?;
    Ok(Json(BookingEnvelope {
        success: true,
        message: Some("Booking cancelled"),
        data: booking,
    }))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingEnvelope<Uuid>>, AppError> {
    state.bookings.delete(id).await?;
    Ok(Json(BookingEnvelope {
        success: true,
        message: Some("Booking deleted"),
        data: id,
    }))
}
