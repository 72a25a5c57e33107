//! Page numbers on the TOC page
//!
//! The TOC is rendered before the body page counts are known, so its entry
//! rows carry no numbers. Once offsets are computed the absolute ranges are
//! drawn onto the assembled TOC page, right-aligned in each row.

use crate::assemble::AssembledDocument;
use crate::constants::*;
use crate::offsets::format_page_range;
use crate::page::{add_font_resource, overlay_content};
use crate::toc::TocLayout;
use crate::types::*;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object};

/// Draw each entry's page range onto the first TOC page.
///
/// A failure here leaves the TOC lying about where sections start, so it is
/// an assembly error rather than a warning.
pub fn stamp_page_numbers(assembled: &mut AssembledDocument, layout: &TocLayout) -> Result<()> {
    let toc_index = assembled.ranges.toc.first_index();
    let toc_page = assembled.page_handle(toc_index).ok_or_else(|| {
        BilingualError::Assembly("combined document has no TOC page".to_string())
    })?;
    let media_box = assembled.media_box(toc_page).ok_or_else(|| {
        BilingualError::Assembly("TOC page has no usable MediaBox".to_string())
    })?;

    let mut operations = Vec::new();
    for entry in &layout.entries {
        let range = assembled.ranges.for_language(entry.language);
        let text = format_page_range(range);
        let (x, y) = layout.place_point(
            layout.entry_rect(entry.row).right() - text_width(&text),
            layout.entry_baseline_pt(entry.row),
            media_box,
        );
        operations.extend(text_operations(&text, x, y));
    }

    let content = Content { operations }.encode()?;

    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    let font_id = assembled.document.add_object(font);

    add_font_resource(&mut assembled.document, toc_page, STAMP_FONT_NAME, font_id)?;
    overlay_content(&mut assembled.document, toc_page, content)?;

    log::debug!("Stamped {} page references on the TOC", layout.entries.len());
    Ok(())
}

/// Approximate rendered width of ASCII text in the stamp font (points)
fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * TOC_ENTRY_FONT_SIZE * HELVETICA_CHAR_WIDTH_RATIO
}

fn text_operations(text: &str, x: f32, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(STAMP_FONT_NAME.as_bytes().to_vec()),
                TOC_ENTRY_FONT_SIZE.into(),
            ],
        ),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}
