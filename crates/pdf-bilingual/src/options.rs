use crate::constants::{DEFAULT_RENDER_TIMEOUT_MS, MAX_HTML_BYTES, mm_to_pt};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    #[serde(rename_all = "camelCase")]
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Format name as the renderer expects it, `None` for custom sizes
    pub fn renderer_name(self) -> Option<&'static str> {
        match self {
            PaperSize::A3 => Some("A3"),
            PaperSize::A4 => Some("A4"),
            PaperSize::A5 => Some("A5"),
            PaperSize::Letter => Some("Letter"),
            PaperSize::Legal => Some("Legal"),
            PaperSize::Tabloid => Some("Tabloid"),
            PaperSize::Custom { .. } => None,
        }
    }
}

/// Page margins in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMargins {
    pub top_mm: f32,
    pub right_mm: f32,
    pub bottom_mm: f32,
    pub left_mm: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

impl PageMargins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_mm: f32) -> Self {
        Self {
            top_mm: margin_mm,
            right_mm: margin_mm,
            bottom_mm: margin_mm,
            left_mm: margin_mm,
        }
    }
}

/// Options forwarded to the rendering service for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub format: PaperSize,
    pub orientation: Orientation,
    pub margins: PageMargins,
    pub print_background: bool,
    pub display_header_footer: bool,
    pub header_template: Option<String>,
    pub footer_template: Option<String>,
    pub scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: PageMargins::default(),
            print_background: true,
            display_header_footer: false,
            header_template: None,
            footer_template: None,
            scale: 1.0,
        }
    }
}

impl RenderOptions {
    /// Options for the TOC page: same paper, no margins, no header or footer
    pub fn for_toc(&self) -> Self {
        Self {
            format: self.format,
            orientation: self.orientation,
            margins: PageMargins::uniform(0.0),
            print_background: true,
            display_header_footer: false,
            header_template: None,
            footer_template: None,
            scale: 1.0,
        }
    }

    /// Page size in points with orientation applied
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = self.format.dimensions_with_orientation(self.orientation);
        (mm_to_pt(w), mm_to_pt(h))
    }

    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.format.dimensions_mm();
        if w <= 0.0 || h <= 0.0 {
            return Err(BilingualError::Validation(
                "options.format must have a positive size".to_string(),
            ));
        }
        if !(0.1..=2.0).contains(&self.scale) {
            return Err(BilingualError::Validation(
                "options.scale must be between 0.1 and 2".to_string(),
            ));
        }
        let m = &self.margins;
        if [m.top_mm, m.right_mm, m.bottom_mm, m.left_mm]
            .iter()
            .any(|v| *v < 0.0)
        {
            return Err(BilingualError::Validation(
                "options.margins must not be negative".to_string(),
            ));
        }
        if m.left_mm + m.right_mm >= w.min(h) || m.top_mm + m.bottom_mm >= w.min(h) {
            return Err(BilingualError::Validation(
                "options.margins leave no printable area".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the table-of-contents page is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocStrategy {
    /// HTML sent through the rendering service (consistent fonts)
    #[default]
    Html,
    /// Drawn locally with builtin PDF fonts (Latin text only)
    Drawn,
}

/// Browser viewport used by the rendering service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1240,
            height: 1754,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Endpoint of the HTML-to-PDF service
    pub render_url: String,
    /// Bearer token for the rendering service
    pub api_token: Option<String>,
    pub render_timeout_ms: u64,
    pub max_html_bytes: usize,
    pub toc_strategy: TocStrategy,
    /// Stylesheet loaded by the HTML TOC for CJK glyph coverage
    pub toc_font_css_url: String,
    pub toc_font_family: String,
    pub viewport: Viewport,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_url: "http://localhost:3000/render".to_string(),
            api_token: None,
            render_timeout_ms: DEFAULT_RENDER_TIMEOUT_MS,
            max_html_bytes: MAX_HTML_BYTES,
            toc_strategy: TocStrategy::Html,
            toc_font_css_url:
                "https://fonts.googleapis.com/css2?family=Noto+Sans+JP:wght@400;700&display=swap"
                    .to_string(),
            toc_font_family: "Noto Sans JP".to_string(),
            viewport: Viewport::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| BilingualError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BilingualError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.render_url.trim().is_empty() {
            return Err(BilingualError::Config("render_url is empty".to_string()));
        }
        if self.render_timeout_ms == 0 {
            return Err(BilingualError::Config(
                "render_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_html_bytes == 0 || self.max_html_bytes > MAX_HTML_BYTES {
            return Err(BilingualError::Config(format!(
                "max_html_bytes must be between 1 and {}",
                MAX_HTML_BYTES
            )));
        }
        if self.toc_font_family.contains(['<', '>', '"', '\'', ';']) {
            return Err(BilingualError::Config(
                "toc_font_family contains characters not allowed in CSS".to_string(),
            ));
        }
        Ok(())
    }
}
