//! Public and protected demonstration routes

use axum::{routing::get, Router};

use crate::handlers::demo;
use crate::state::AppState;

pub fn demo_routes() -> Router<AppState> {
    Router::new()
        .route("/test/public", get(demo::public_endpoint))
        .route("/test/protected", get(demo::protected_endpoint))
}
