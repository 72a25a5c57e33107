use crate::error::Result;
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use pdf_bilingual::{BilingualRequest, EncodedOutput};
use serde_json::{Value, json};

/// Render, assemble and link a bilingual document
pub async fn generate_bilingual(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BilingualRequest>, JsonRejection>,
) -> Result<Json<EncodedOutput>> {
    let Json(request) = payload?;

    log::info!(
        "Bilingual request: first language {}, {} + {} bytes of HTML",
        request.first_language,
        request.html_first.len(),
        request.html_second.len()
    );

    let output = state.engine.generate(request).await?;
    Ok(Json(output.encode()))
}

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
