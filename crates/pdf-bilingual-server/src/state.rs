use pdf_bilingual::BilingualEngine;
use std::sync::Arc;

/// Headroom for JSON framing and TOC metadata on top of the two HTML bodies
const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BilingualEngine>,

    /// Key expected in `X-API-Key`; `None` disables the check
    pub api_key: Option<Arc<str>>,

    /// Largest accepted request body
    pub body_limit: usize,
}

impl AppState {
    pub fn new(engine: BilingualEngine, api_key: Option<String>) -> Self {
        let body_limit = 2 * engine.config().max_html_bytes + BODY_OVERHEAD_BYTES;
        Self {
            engine: Arc::new(engine),
            api_key: api_key.map(Arc::from),
            body_limit,
        }
    }
}
