//! HTTP implementation of the render client

use super::client::{RenderClient, RenderRequest};
use crate::options::{EngineConfig, Orientation, RenderOptions, Viewport};
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Longest slice of an upstream error body written to the log
const ERROR_EXCERPT_CHARS: usize = 200;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderPayload<'a> {
    html: &'a str,
    viewport: Viewport,
    pdf_options: PdfOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PdfOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<String>,
    landscape: bool,
    margin: MarginPayload,
    print_background: bool,
    display_header_footer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer_template: Option<&'a str>,
    scale: f32,
    #[serde(rename = "preferCSSPageSize")]
    prefer_css_page_size: bool,
}

#[derive(Serialize)]
struct MarginPayload {
    top: String,
    right: String,
    bottom: String,
    left: String,
}

impl<'a> PdfOptions<'a> {
    fn from_options(options: &'a RenderOptions) -> Self {
        let (format, width, height) = match options.format.renderer_name() {
            Some(name) => (Some(name), None, None),
            None => {
                let (w, h) = options.format.dimensions_mm();
                (None, Some(format!("{}mm", w)), Some(format!("{}mm", h)))
            }
        };
        let m = &options.margins;
        Self {
            format,
            width,
            height,
            landscape: options.orientation == Orientation::Landscape,
            margin: MarginPayload {
                top: format!("{}mm", m.top_mm),
                right: format!("{}mm", m.right_mm),
                bottom: format!("{}mm", m.bottom_mm),
                left: format!("{}mm", m.left_mm),
            },
            print_background: options.print_background,
            display_header_footer: options.display_header_footer,
            header_template: options.header_template.as_deref(),
            footer_template: options.footer_template.as_deref(),
            scale: options.scale,
            prefer_css_page_size: false,
        }
    }
}

/// Render client for an HTML-to-PDF service reachable over HTTP
#[derive(Clone)]
pub struct HttpRenderClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    viewport: Viewport,
}

impl HttpRenderClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.render_timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.render_url.clone(),
            api_token: config.api_token.clone(),
            viewport: config.viewport,
        })
    }
}

#[async_trait]
impl RenderClient for HttpRenderClient {
    async fn render(&self, section: Section, request: RenderRequest) -> Result<Vec<u8>> {
        let payload = RenderPayload {
            html: request.html(),
            viewport: self.viewport,
            pdf_options: PdfOptions::from_options(request.options()),
        };

        log::debug!(
            "Rendering {} ({} bytes of HTML) via {}",
            section,
            request.html().len(),
            self.endpoint
        );

        let mut builder = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
            log::warn!(
                "Renderer returned HTTP {} for {}: {}",
                status,
                section,
                excerpt.trim()
            );
            return Err(BilingualError::Render {
                section,
                message: format!("renderer returned HTTP {}", status),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(BilingualError::Render {
                section,
                message: "renderer returned an empty body".to_string(),
            });
        }

        log::debug!("Rendered {} ({} bytes of PDF)", section, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PaperSize;

    #[test]
    fn test_pdf_options_named_format() {
        let options = RenderOptions::default();
        let json = serde_json::to_value(PdfOptions::from_options(&options)).unwrap();
        assert_eq!(json["format"], "A4");
        assert_eq!(json["margin"]["top"], "10mm");
        assert_eq!(json["preferCSSPageSize"], false);
        assert!(json.get("width").is_none());
        assert!(json.get("headerTemplate").is_none());
    }

    #[test]
    fn test_pdf_options_custom_size() {
        let options = RenderOptions {
            format: PaperSize::Custom {
                width_mm: 100.0,
                height_mm: 150.0,
            },
            orientation: Orientation::Landscape,
            ..Default::default()
        };
        let json = serde_json::to_value(PdfOptions::from_options(&options)).unwrap();
        assert!(json.get("format").is_none());
        assert_eq!(json["width"], "100mm");
        assert_eq!(json["height"], "150mm");
        assert_eq!(json["landscape"], true);
    }
}
