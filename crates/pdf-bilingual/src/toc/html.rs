//! TOC rendered as HTML through the rendering service

use super::{TocLayout, TocRenderer};
use crate::constants::*;
use crate::options::EngineConfig;
use crate::render::{RenderClient, RenderRequest};
use crate::types::*;
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;

/// Builds TOC markup and renders it with the same service as the bodies.
///
/// The markup only links an external webfont stylesheet; inline font data
/// makes the renderer fail, and inline images cannot inherit page fonts.
pub struct HtmlTocRenderer {
    client: Arc<dyn RenderClient>,
    font_css_url: String,
    font_family: String,
    max_html_bytes: usize,
}

impl HtmlTocRenderer {
    pub fn new(client: Arc<dyn RenderClient>, config: &EngineConfig) -> Self {
        Self {
            client,
            font_css_url: config.toc_font_css_url.clone(),
            font_family: config.toc_font_family.clone(),
            max_html_bytes: config.max_html_bytes,
        }
    }

    /// Generate the TOC document markup
    pub fn build_html(&self, toc: &TocSpec, layout: &TocLayout) -> String {
        let (width_mm, height_mm) = layout.page_size_mm();
        let mut html = String::new();

        // Writing to a String cannot fail
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <link rel=\"stylesheet\" href=\"{css}\">\n<style>\n\
             @page {{ size: {w}mm {h}mm; margin: 0; }}\n\
             html, body {{ margin: 0; padding: 0; }}\n\
             body {{ position: relative; width: {w}mm; height: {h}mm; \
             font-family: '{family}', sans-serif; color: #111; }}\n\
             .line, .entry {{ position: absolute; left: {mx}mm; width: {cw}mm; \
             white-space: nowrap; overflow: hidden; }}\n\
             .entry {{ height: {rh}mm; line-height: {rh}mm; font-size: {ef}pt; \
             border-bottom: 0.3mm dotted #999; box-sizing: border-box; }}\n\
             </style>\n</head>\n<body>\n",
            css = escape_html(&self.font_css_url),
            w = width_mm,
            h = height_mm,
            family = self.font_family,
            mx = TOC_MARGIN_X_MM,
            cw = layout.content_width_mm(),
            rh = TOC_ROW_HEIGHT_MM,
            ef = TOC_ENTRY_FONT_SIZE,
        );

        for line in layout.header_lines(toc) {
            let _ = writeln!(
                html,
                "<div class=\"line\" style=\"top: {}mm; height: {}mm; line-height: {}mm; \
                 font-size: {}pt; font-weight: {};\">{}</div>",
                line.top_mm,
                TOC_HEADER_LINE_MM,
                TOC_HEADER_LINE_MM,
                line.font_size,
                if line.bold { 700 } else { 400 },
                escape_html(&line.text)
            );
        }

        for entry in &layout.entries {
            let _ = writeln!(
                html,
                "<div class=\"entry\" lang=\"{}\" style=\"top: {}mm;\">{}</div>",
                entry.language.tag(),
                layout.entry_top_mm(entry.row),
                entry.language.native_label()
            );
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

#[async_trait]
impl TocRenderer for HtmlTocRenderer {
    async fn render(&self, toc: &TocSpec, layout: &TocLayout) -> Result<Vec<u8>> {
        let html = self.build_html(toc, layout);
        let request = RenderRequest::new("toc", html, layout.options.clone(), self.max_html_bytes)?;
        self.client.render(Section::Toc, request).await
    }
}

/// Escape text for use in HTML content and attribute values
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
