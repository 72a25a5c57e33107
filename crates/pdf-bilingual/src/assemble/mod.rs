//! Combined document assembly
//!
//! Builds a fresh document out of the TOC and both language bodies:
//! 1. Reserve target handles for every source page
//! 2. Deep-copy each page with its resources, in TOC → first → second order
//! 3. Build a single flat page tree and catalog
//!
//! The result carries an explicit translation table from logical page index
//! to page handle. Everything that needs to point at a page after assembly
//! (links, stamped numbers, outlines) goes through that table, never through
//! a source document.

mod copy;

use crate::loader::LoadedDocument;
use crate::types::*;
use copy::ObjectCopier;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// The combined document while it is still being decorated
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub document: Document,
    pub ranges: SectionRanges,
    pub pages_root: ObjectId,
    pub catalog: ObjectId,
    page_handles: Vec<ObjectId>,
}

impl AssembledDocument {
    /// Handle of the page at a 0-based index of the combined document
    pub fn page_handle(&self, index: usize) -> Option<ObjectId> {
        self.page_handles.get(index).copied()
    }

    pub fn page_handles(&self) -> &[ObjectId] {
        &self.page_handles
    }

    pub fn page_count(&self) -> usize {
        self.page_handles.len()
    }

    /// Handles of all pages in one section
    pub fn section_handles(&self, range: &PageRange) -> &[ObjectId] {
        &self.page_handles[range.indices()]
    }

    /// MediaBox of an assembled page
    pub fn media_box(&self, handle: ObjectId) -> Option<Rect> {
        crate::page::media_box(&self.document, handle)
    }
}

/// Deep-copy the three sources into one new document, in range order.
///
/// Source documents are only read. Any page that cannot be copied aborts the
/// whole assembly.
pub fn assemble(
    toc: &LoadedDocument,
    first: &LoadedDocument,
    second: &LoadedDocument,
    ranges: &SectionRanges,
) -> Result<AssembledDocument> {
    let mut output = Document::with_version("1.7");
    let pages_root = output.new_object_id();
    let mut page_handles = Vec::with_capacity(ranges.total_pages());

    for (source, range) in [
        (toc, &ranges.toc),
        (first, &ranges.first),
        (second, &ranges.second),
    ] {
        check_source(source, range, page_handles.len())?;

        let mut copier = ObjectCopier::new(&source.document, &mut output);
        let reserved: Vec<ObjectId> = source
            .page_ids
            .iter()
            .map(|&page_id| copier.reserve(page_id))
            .collect();
        for &page_id in &source.page_ids {
            copier.copy_page(page_id, pages_root)?;
        }

        log::debug!(
            "Copied {} pages of {} to pages {}-{}",
            range.page_count,
            range.section,
            range.start_page,
            range.end_page()
        );
        page_handles.extend(reserved);
    }

    if page_handles.len() != ranges.total_pages() {
        return Err(BilingualError::Assembly(format!(
            "assembled {} pages, expected {}",
            page_handles.len(),
            ranges.total_pages()
        )));
    }

    let kids: Vec<Object> = page_handles.iter().map(|&id| Object::Reference(id)).collect();
    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(kids));
    pages.set("Count", Object::Integer(page_handles.len() as i64));
    output.objects.insert(pages_root, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_root));
    let catalog_id = output.add_object(catalog);
    output.trailer.set("Root", Object::Reference(catalog_id));

    Ok(AssembledDocument {
        document: output,
        ranges: *ranges,
        pages_root,
        catalog: catalog_id,
        page_handles,
    })
}

fn check_source(source: &LoadedDocument, range: &PageRange, assembled: usize) -> Result<()> {
    if source.section != range.section {
        return Err(BilingualError::Assembly(format!(
            "{} document supplied for the {} range",
            source.section, range.section
        )));
    }
    if source.page_count() != range.page_count {
        return Err(BilingualError::Assembly(format!(
            "{} has {} pages but its range expects {}",
            range.section,
            source.page_count(),
            range.page_count
        )));
    }
    if assembled != range.first_index() {
        return Err(BilingualError::Assembly(format!(
            "{} range starts at page {} but {} pages precede it",
            range.section, range.start_page, assembled
        )));
    }
    Ok(())
}
