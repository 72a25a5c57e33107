//! Navigation links from the TOC into the language sections

use crate::assemble::AssembledDocument;
use crate::page::push_annotation;
use crate::toc::TocLayout;
use crate::types::*;
use lopdf::{Dictionary, Object};

/// Result of attaching links; skipped links become warnings
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub attached: Vec<LinkAnnotation>,
    pub warnings: Vec<AnnotationWarning>,
}

/// One link per TOC entry, from the first TOC page to the first page of the
/// entry's section
pub fn plan_links(layout: &TocLayout, ranges: &SectionRanges) -> Vec<LinkAnnotation> {
    layout
        .entries
        .iter()
        .map(|entry| {
            let range = ranges.for_language(entry.language);
            LinkAnnotation {
                source_page_index: ranges.toc.first_index(),
                rect: layout.entry_rect(entry.row),
                target_page_index: range.first_index(),
                target_position: TargetPosition::Top,
                section: range.section,
            }
        })
        .collect()
}

/// Attach link annotations to the assembled document.
///
/// Both ends are resolved through the assembled page table. A link that
/// cannot be attached is logged and skipped; it never fails the document.
pub fn attach_links(
    assembled: &mut AssembledDocument,
    layout: &TocLayout,
    links: &[LinkAnnotation],
) -> LinkReport {
    let mut report = LinkReport::default();

    for link in links {
        match attach_link(assembled, layout, link) {
            Ok(()) => report.attached.push(*link),
            Err(reason) => {
                let warning = AnnotationWarning {
                    section: link.section,
                    reason,
                };
                log::warn!("{}", warning);
                report.warnings.push(warning);
            }
        }
    }

    log::debug!(
        "Attached {} of {} TOC links",
        report.attached.len(),
        links.len()
    );
    report
}

fn attach_link(
    assembled: &mut AssembledDocument,
    layout: &TocLayout,
    link: &LinkAnnotation,
) -> std::result::Result<(), String> {
    let source = assembled.page_handle(link.source_page_index).ok_or_else(|| {
        format!(
            "source page {} is outside the document",
            link.source_page_index + 1
        )
    })?;
    let target = assembled.page_handle(link.target_page_index).ok_or_else(|| {
        format!(
            "target page {} is outside the document",
            link.target_page_index + 1
        )
    })?;

    let source_box = assembled
        .media_box(source)
        .ok_or_else(|| "source page has no usable MediaBox".to_string())?;
    let rect = layout.place(link.rect, source_box);

    let destination = match link.target_position {
        TargetPosition::Top => {
            let target_box = assembled
                .media_box(target)
                .ok_or_else(|| "target page has no usable MediaBox".to_string())?;
            vec![
                Object::Reference(target),
                Object::Name(b"XYZ".to_vec()),
                Object::Integer(0),
                target_box.top().into(),
                Object::Null,
            ]
        }
        TargetPosition::Fit => vec![Object::Reference(target), Object::Name(b"Fit".to_vec())],
    };

    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"Link".to_vec()));
    annot.set(
        "Rect",
        Object::Array(vec![
            rect.x.into(),
            rect.y.into(),
            rect.right().into(),
            rect.top().into(),
        ]),
    );
    annot.set("Border", Object::Array(vec![Object::Integer(0); 3]));
    annot.set("P", Object::Reference(source));
    annot.set("Dest", Object::Array(destination));

    let annot_id = assembled.document.add_object(annot);
    push_annotation(&mut assembled.document, source, annot_id).map_err(|e| e.to_string())
}
