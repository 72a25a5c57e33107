use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// API key authentication middleware
pub async fn require_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        if provided != expected {
            log::warn!("Rejected request with invalid API key");
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
