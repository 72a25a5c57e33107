use crate::options::RenderOptions;
use crate::types::*;
use async_trait::async_trait;
use std::fmt;

/// HTML plus rendering options for one render call
#[derive(Clone)]
pub struct RenderRequest {
    html: String,
    options: RenderOptions,
}

impl RenderRequest {
    /// Build a request, rejecting HTML that is empty or above `max_html_bytes`
    pub fn new(
        field: &'static str,
        html: String,
        options: RenderOptions,
        max_html_bytes: usize,
    ) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(BilingualError::Validation(format!("{} is required", field)));
        }
        if html.len() > max_html_bytes {
            return Err(BilingualError::PayloadTooLarge {
                field,
                size: html.len(),
                limit: max_html_bytes,
            });
        }
        Ok(Self { html, options })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

// HTML stays out of logs and error messages
impl fmt::Debug for RenderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderRequest")
            .field("html_bytes", &self.html.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Turns HTML into PDF bytes.
///
/// Implementations perform no retries; a failed call is reported as
/// `BilingualError::Render` (or `Http`) and the caller decides what to do.
#[async_trait]
pub trait RenderClient: Send + Sync {
    async fn render(&self, section: Section, request: RenderRequest) -> Result<Vec<u8>>;
}
