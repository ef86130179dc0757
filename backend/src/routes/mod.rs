//! Route definitions for the auth API

use axum::{routing::get, Router};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

mod auth;
mod demo;

pub use auth::auth_routes;
pub use demo::demo_routes;

/// Assemble the full application router with its middleware stack.
///
/// CORS is left to the caller since it depends on deployment configuration.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(auth_routes())
        .merge(demo_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
