//! HTTP front end for the bilingual document engine
//!
//! Routes:
//! - `POST /api/v1/bilingual` (API key required)
//! - `GET /health`

pub mod api;
pub mod error;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;

pub fn build_router(state: AppState) -> Router {
    // API routes (with auth)
    let api_routes = Router::new()
        .route("/api/v1/bilingual", post(api::generate_bilingual))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_api_key,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(api::health))
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(state.body_limit))
        .with_state(state)
}
