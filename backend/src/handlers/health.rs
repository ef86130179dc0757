//! Service banner and health check

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub version: String,
}

/// GET /
pub async fn root() -> &'static str {
    "Auth API Server"
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let users = state.auth_service.users();
    let status = if users.is_healthy().await {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store: users.backend().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
