//! TOC drawn directly with builtin PDF fonts

use super::{TocLayout, TocRenderer};
use crate::constants::*;
use crate::types::{Result, TocSpec};
use async_trait::async_trait;
use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};

/// Draws the TOC page locally, without a render call.
///
/// Builtin fonts only cover Latin text: entry labels use their Latin names
/// and header lines with other scripts are left out. Prefer
/// `HtmlTocRenderer` when the TOC carries Japanese metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawnTocRenderer;

impl DrawnTocRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the TOC page and return its PDF bytes
    pub fn draw(&self, toc: &TocSpec, layout: &TocLayout) -> Result<Vec<u8>> {
        let (width_mm, height_mm) = layout.page_size_mm();
        let mut doc = PdfDocument::new(&latin_or(&toc.title, "Contents"));
        let mut ops = Vec::new();

        for line in layout.header_lines(toc) {
            if !line.text.is_ascii() {
                log::warn!(
                    "Drawn TOC cannot render non-Latin header text; line at {}mm skipped",
                    line.top_mm
                );
                continue;
            }
            let baseline_mm = height_mm - line.top_mm - TOC_HEADER_LINE_MM * 0.7;
            push_text(
                &mut ops,
                TOC_MARGIN_X_MM,
                baseline_mm,
                line.font_size,
                line.bold,
                &line.text,
            );
        }

        for entry in &layout.entries {
            let baseline_mm = pt_to_mm(layout.entry_baseline_pt(entry.row));
            push_text(
                &mut ops,
                TOC_MARGIN_X_MM,
                baseline_mm,
                TOC_ENTRY_FONT_SIZE,
                false,
                entry.language.latin_label(),
            );
        }

        doc.pages.push(PdfPage::new(Mm(width_mm), Mm(height_mm), ops));

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        Ok(bytes)
    }
}

#[async_trait]
impl TocRenderer for DrawnTocRenderer {
    async fn render(&self, toc: &TocSpec, layout: &TocLayout) -> Result<Vec<u8>> {
        let renderer = *self;
        let toc = toc.clone();
        let layout = layout.clone();

        // PDF generation is CPU-bound, spawn blocking
        tokio::task::spawn_blocking(move || renderer.draw(&toc, &layout)).await?
    }
}

fn builtin(bold: bool) -> BuiltinFont {
    if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

fn push_text(ops: &mut Vec<Op>, x_mm: f32, y_mm: f32, size: f32, bold: bool, text: &str) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point::new(Mm(x_mm), Mm(y_mm)),
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        font: builtin(bold),
        size: Pt(size),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font: builtin(bold),
    });
    ops.push(Op::EndTextSection);
}

fn latin_or(text: &str, fallback: &str) -> String {
    if text.is_ascii() {
        text.to_string()
    } else {
        fallback.to_string()
    }
}
