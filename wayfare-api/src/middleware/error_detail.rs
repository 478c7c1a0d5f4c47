use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ErrorDetail;
use crate::state::AppState;

/// Re-renders 5xx bodies with their `error` detail unless the server runs in
/// production.
pub async fn error_detail_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let Some(ErrorDetail { message, detail }) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if state.hide_error_details {
        return response;
    }

    let (parts, _) = response.into_parts();
    let body = Json(json!({
        "success": false,
        "message": message,
        "error": detail,
    }))
    .into_response()
    .into_body();
    Response::from_parts(parts, body)
}
