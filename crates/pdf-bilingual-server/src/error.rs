use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdf_bilingual::{BilingualError, ErrorKind};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] BilingualError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Request body too large: {0}")]
    BodyTooLarge(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::BodyTooLarge(rejection.body_text())
        } else {
            Self::InvalidBody(rejection.body_text())
        }
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Generation(e) => {
                let status = match e.kind() {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                    ErrorKind::Render
                    | ErrorKind::MalformedDocument
                    | ErrorKind::Assembly
                    | ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind().as_str())
            }
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, ErrorKind::Validation.as_str()),
            Self::BodyTooLarge(_) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorKind::PayloadTooLarge.as_str(),
            ),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            Self::Unauthorized => "Invalid or missing API key".to_string(),
            Self::Generation(BilingualError::Config(_)) => "Service misconfigured".to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            log::error!("{} ({}): {}", status, kind, self);
        }

        let body = Json(json!({
            "kind": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
