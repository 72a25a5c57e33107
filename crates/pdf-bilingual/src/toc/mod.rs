//! Table-of-contents page production
//!
//! Two interchangeable strategies produce the TOC page as PDF bytes:
//! - `HtmlTocRenderer` sends generated HTML through the rendering service,
//!   so the TOC uses the same font stack as the bodies
//! - `DrawnTocRenderer` draws the page locally with builtin PDF fonts
//!
//! Both place entries on the shared `TocLayout` grid. Page numbers are not
//! part of the rendered page; they are stamped after assembly, once the
//! section offsets are known.

mod drawn;
mod html;

pub use drawn::DrawnTocRenderer;
pub use html::HtmlTocRenderer;

use crate::constants::*;
use crate::options::RenderOptions;
use crate::types::*;
use async_trait::async_trait;

/// Produces the TOC page for a request
#[async_trait]
pub trait TocRenderer: Send + Sync {
    async fn render(&self, toc: &TocSpec, layout: &TocLayout) -> Result<Vec<u8>>;
}

/// One navigable row of the TOC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TocEntry {
    pub language: Language,
    pub row: usize,
}

/// A line of the TOC header block
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLine {
    pub text: String,
    pub top_mm: f32,
    pub font_size: f32,
    pub bold: bool,
}

/// Geometry of the TOC page, shared by renderers, stamper and linker
#[derive(Debug, Clone, PartialEq)]
pub struct TocLayout {
    pub options: RenderOptions,
    pub entries: Vec<TocEntry>,
}

impl TocLayout {
    /// Layout for a TOC printed on the same paper as the bodies
    pub fn new(body_options: &RenderOptions, first_language: Language) -> Result<Self> {
        let layout = Self {
            options: body_options.for_toc(),
            entries: vec![
                TocEntry {
                    language: first_language,
                    row: 0,
                },
                TocEntry {
                    language: first_language.other(),
                    row: 1,
                },
            ],
        };

        let (width_mm, height_mm) = layout.page_size_mm();
        let entries_bottom = TOC_ENTRIES_TOP_MM + layout.entries.len() as f32 * TOC_ROW_HEIGHT_MM;
        if entries_bottom > height_mm || width_mm <= 2.0 * TOC_MARGIN_X_MM {
            return Err(BilingualError::Validation(format!(
                "paper size {:.0}x{:.0}mm is too small for the table of contents",
                width_mm, height_mm
            )));
        }
        Ok(layout)
    }

    pub fn page_size_mm(&self) -> (f32, f32) {
        self.options
            .format
            .dimensions_with_orientation(self.options.orientation)
    }

    pub fn page_size_pt(&self) -> (f32, f32) {
        self.options.page_size_pt()
    }

    /// Distance of an entry row's top edge from the top of the page
    pub fn entry_top_mm(&self, row: usize) -> f32 {
        TOC_ENTRIES_TOP_MM + row as f32 * TOC_ROW_HEIGHT_MM
    }

    /// Width available to rows
    pub fn content_width_mm(&self) -> f32 {
        self.page_size_mm().0 - 2.0 * TOC_MARGIN_X_MM
    }

    /// Clickable area of an entry row in PDF user space
    pub fn entry_rect(&self, row: usize) -> Rect {
        let (_, height_mm) = self.page_size_mm();
        let bottom_mm = height_mm - self.entry_top_mm(row) - TOC_ROW_HEIGHT_MM;
        Rect::new(
            mm_to_pt(TOC_MARGIN_X_MM),
            mm_to_pt(bottom_mm),
            mm_to_pt(self.content_width_mm()),
            mm_to_pt(TOC_ROW_HEIGHT_MM),
        )
    }

    /// Baseline for text vertically centred in an entry row (points)
    pub fn entry_baseline_pt(&self, row: usize) -> f32 {
        let rect = self.entry_rect(row);
        rect.y + (rect.height - TOC_ENTRY_FONT_SIZE * 0.7) / 2.0
    }

    /// Move a layout rectangle onto a rendered page.
    ///
    /// Renderers round page sizes, so positions are anchored to the top-left
    /// corner of the page's actual MediaBox.
    pub fn place(&self, rect: Rect, media_box: Rect) -> Rect {
        let (x, y) = self.place_point(rect.x, rect.y, media_box);
        Rect::new(x, y, rect.width, rect.height)
    }

    pub fn place_point(&self, x: f32, y: f32, media_box: Rect) -> (f32, f32) {
        let (_, layout_height) = self.page_size_pt();
        (media_box.x + x, media_box.top() - (layout_height - y))
    }

    /// Header block lines in display order; blank optional fields are skipped
    pub fn header_lines(&self, toc: &TocSpec) -> Vec<HeaderLine> {
        let mut lines = Vec::new();
        let mut top_mm = TOC_TITLE_TOP_MM;
        let mut push = |text: &str, font_size: f32, bold: bool| {
            if text.trim().is_empty() {
                return;
            }
            lines.push(HeaderLine {
                text: text.trim().to_string(),
                top_mm,
                font_size,
                bold,
            });
            top_mm += TOC_HEADER_LINE_MM;
        };

        push(&toc.title, TOC_TITLE_FONT_SIZE, true);
        if let Some(secondary) = &toc.title_secondary {
            push(secondary, TOC_SUBTITLE_FONT_SIZE, true);
        }
        if let Some(client) = &toc.client_name {
            push(client, TOC_SUBTITLE_FONT_SIZE, false);
        }
        push(&toc.date, TOC_SUBTITLE_FONT_SIZE, false);
        if let Some(date) = &toc.date_secondary {
            push(date, TOC_SUBTITLE_FONT_SIZE, false);
        }
        lines
    }
}
