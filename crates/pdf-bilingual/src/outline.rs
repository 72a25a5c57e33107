//! Document outline (bookmarks) for the combined document

use crate::assemble::AssembledDocument;
use crate::page::text_string;
use crate::types::*;
use lopdf::{Dictionary, Object, ObjectId};

/// Build a flat outline: the TOC, then each language section in order.
///
/// Viewers open with the outline panel visible. Titles use the native
/// language labels, encoded as UTF-16 where needed.
pub fn build_outline(assembled: &mut AssembledDocument, toc: &TocSpec) -> Result<ObjectId> {
    let ranges = assembled.ranges;
    let toc_title = if toc.title.trim().is_empty() {
        "Contents".to_string()
    } else {
        toc.title.trim().to_string()
    };

    let mut items: Vec<(String, ObjectId)> = Vec::with_capacity(3);
    for range in ranges.iter() {
        let title = match range.section {
            Section::Toc => toc_title.clone(),
            Section::Body(language) => language.native_label().to_string(),
        };
        let page = assembled.page_handle(range.first_index()).ok_or_else(|| {
            BilingualError::Assembly(format!("no page at the start of {}", range.section))
        })?;
        items.push((title, page));
    }

    let document = &mut assembled.document;
    let root_id = document.new_object_id();
    let item_ids: Vec<ObjectId> = items.iter().map(|_| document.new_object_id()).collect();

    for (index, (title, page)) in items.iter().enumerate() {
        let mut item = Dictionary::new();
        item.set("Title", text_string(title));
        item.set("Parent", Object::Reference(root_id));
        item.set(
            "Dest",
            Object::Array(vec![Object::Reference(*page), Object::Name(b"Fit".to_vec())]),
        );
        if index > 0 {
            item.set("Prev", Object::Reference(item_ids[index - 1]));
        }
        if let Some(next) = item_ids.get(index + 1) {
            item.set("Next", Object::Reference(*next));
        }
        document.objects.insert(item_ids[index], Object::Dictionary(item));
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Outlines".to_vec()));
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        root.set("First", Object::Reference(*first));
        root.set("Last", Object::Reference(*last));
    }
    root.set("Count", Object::Integer(item_ids.len() as i64));
    document.objects.insert(root_id, Object::Dictionary(root));

    let catalog = document.get_object_mut(assembled.catalog)?.as_dict_mut()?;
    catalog.set("Outlines", Object::Reference(root_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    Ok(root_id)
}
