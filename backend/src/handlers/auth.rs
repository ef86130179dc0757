//! Authentication HTTP handlers
//!
//! Endpoints for email/password registration and login.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /auth/register - Create a user account
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<&'static str> {
    tracing::info!(email = %req.email, "Register request");

    req.validate()?;

    state
        .auth_service
        .register(&req.name, &req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(email = %req.email, error = %e, "Registration rejected");
            ApiError::from(e)
        })?;

    Ok("User registered successfully!")
}

/// POST /auth/login - Verify credentials and issue a session token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    // Unreadable bodies get the same answer as wrong credentials
    let Json(req) = payload.map_err(|e| {
        tracing::warn!(error = %e.body_text(), "Login failed: unreadable body");
        ApiError::InvalidCredentials
    })?;

    tracing::info!(email = %req.email, "Login attempt");

    // Malformed credentials get the same answer as wrong ones
    if let Err(e) = req.validate() {
        tracing::warn!(email = %req.email, error = %e, "Login failed");
        return Err(ApiError::InvalidCredentials);
    }

    let response = state
        .auth_service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(email = %req.email, error = %e, "Login failed");
            ApiError::from(e)
        })?;

    tracing::info!(email = %response.email, "Login successful");

    Ok(Json(response))
}

/// GET /auth/test - Liveness check for the auth endpoints
pub async fn auth_test() -> &'static str {
    "Authentication API is working!"
}
