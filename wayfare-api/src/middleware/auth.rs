use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

const ADMIN_ROLES: [&str; 2] = ["ADMIN", "SUPER_ADMIN"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    pub exp: usize,
}

/// Requires an HS256 bearer token whose role is ADMIN or SUPER_ADMIN.
/// The decoded claims are placed in the request extensions.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let token_data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::AuthenticationError(format!("Invalid token: {}", e)))?;

    if !ADMIN_ROLES.contains(&token_data.claims.role.as_str()) {
        tracing::warn!(sub = %token_data.claims.sub, role = %token_data.claims.role, "Admin route refused");
        return Err(AppError::AuthorizationError("Admin access required".to_string()));
    }

    req.extensions_mut().insert(token_data.claims);

    Ok(next.run(req).await)
}
