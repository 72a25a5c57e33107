//! Page dictionary edits on the assembled document
//!
//! Helpers shared by the stamper, the linker and the outline builder. They
//! only touch objects that belong to the assembled document.

use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// MediaBox of a page as a rectangle in user space
pub fn media_box(doc: &Document, page_id: ObjectId) -> Option<Rect> {
    let page = doc.get_dictionary(page_id).ok()?;
    let (_, entry) = doc.dereference(page.get(b"MediaBox").ok()?).ok()?;
    let values = entry.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let mut numbers = [0.0f32; 4];
    for (slot, value) in numbers.iter_mut().zip(values) {
        let (_, value) = doc.dereference(value).ok()?;
        *slot = value.as_float().ok()?;
    }
    let [x0, y0, x1, y1] = numbers;
    Some(Rect::new(
        x0.min(x1),
        y0.min(y1),
        (x1 - x0).abs(),
        (y1 - y0).abs(),
    ))
}

/// Draw extra content on top of a page.
///
/// The existing content is wrapped in `q`/`Q` so any graphics state it
/// leaves behind does not leak into the overlay. An indirect `/Contents`
/// array is flattened into the new array.
pub fn overlay_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<()> {
    let existing = existing_contents(doc, page_id)?;

    let mut overlay = b"Q\n".to_vec();
    overlay.extend_from_slice(&content);

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(overlay_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Content stream references of a page, in drawing order
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let unsupported = || {
        BilingualError::Assembly(format!(
            "page {:?} has an unsupported /Contents entry",
            page_id
        ))
    };
    match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Array(items)) => Ok(items.clone()),
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Stream(_) => Ok(vec![Object::Reference(*id)]),
            Object::Array(items) => {
                if items.iter().all(|item| matches!(item, Object::Reference(_))) {
                    Ok(items.clone())
                } else {
                    Err(unsupported())
                }
            }
            _ => Err(unsupported()),
        },
        Ok(_) => Err(unsupported()),
        Err(_) => Ok(Vec::new()),
    }
}

/// Register a font under `name` in the page's own resource dictionary.
///
/// Shared resource dictionaries are copied onto the page first so the new
/// entry does not appear on other pages.
pub fn add_font_resource(
    doc: &mut Document,
    page_id: ObjectId,
    name: &str,
    font_id: ObjectId,
) -> Result<()> {
    let mut resources = owned_dictionary(doc, doc.get_dictionary(page_id)?.get(b"Resources").ok())?;
    let mut fonts = owned_dictionary(doc, resources.get(b"Font").ok())?;
    fonts.set(name, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Append an annotation to a page's `/Annots`
pub fn push_annotation(doc: &mut Document, page_id: ObjectId, annot_id: ObjectId) -> Result<()> {
    let annots_ref = match doc.get_dictionary(page_id)?.get(b"Annots") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    if let Some(array_id) = annots_ref {
        doc.get_object_mut(array_id)?
            .as_array_mut()?
            .push(Object::Reference(annot_id));
        return Ok(());
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    match page.get_mut(b"Annots") {
        Ok(Object::Array(items)) => items.push(Object::Reference(annot_id)),
        Ok(_) => {
            return Err(BilingualError::Assembly(format!(
                "page {:?} has an unsupported /Annots entry",
                page_id
            )));
        }
        Err(_) => page.set("Annots", Object::Array(vec![Object::Reference(annot_id)])),
    }
    Ok(())
}

/// Encode text as a PDF text string (UTF-16BE with BOM when not ASCII)
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn owned_dictionary(doc: &Document, entry: Option<&Object>) -> Result<Dictionary> {
    match entry {
        None => Ok(Dictionary::new()),
        Some(Object::Dictionary(dict)) => Ok(dict.clone()),
        Some(Object::Reference(id)) => Ok(doc.get_dictionary(*id)?.clone()),
        Some(_) => Err(BilingualError::Assembly(
            "resource entry is neither a dictionary nor a reference".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(doc: &mut Document, extra: Vec<(&str, Object)>) -> ObjectId {
        let mut page = Dictionary::from_iter(vec![("Type", Object::Name(b"Page".to_vec()))]);
        for (key, value) in extra {
            page.set(key, value);
        }
        doc.add_object(page)
    }

    fn rect_array(values: [i64; 4]) -> Object {
        Object::Array(values.into_iter().map(Object::Integer).collect())
    }

    #[test]
    fn test_media_box_direct() {
        let mut doc = Document::with_version("1.7");
        let page_id = page_with(&mut doc, vec![("MediaBox", rect_array([0, 0, 595, 842]))]);
        assert_eq!(media_box(&doc, page_id), Some(Rect::new(0.0, 0.0, 595.0, 842.0)));
    }

    #[test]
    fn test_media_box_indirect() {
        let mut doc = Document::with_version("1.7");
        let height_id = doc.add_object(Object::Integer(842));
        let box_id = doc.add_object(Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(612.0),
            Object::Reference(height_id),
        ]));
        let page_id = page_with(&mut doc, vec![("MediaBox", Object::Reference(box_id))]);
        assert_eq!(media_box(&doc, page_id), Some(Rect::new(0.0, 0.0, 612.0, 842.0)));
    }

    #[test]
    fn test_media_box_missing() {
        let mut doc = Document::with_version("1.7");
        let page_id = page_with(&mut doc, vec![]);
        assert_eq!(media_box(&doc, page_id), None);
    }

    #[test]
    fn test_overlay_flattens_indirect_contents_array() {
        let mut doc = Document::with_version("1.7");
        let body_id = doc.add_object(Stream::new(Dictionary::new(), b"BT ET".to_vec()));
        let array_id = doc.add_object(Object::Array(vec![Object::Reference(body_id)]));
        let page_id = page_with(&mut doc, vec![("Contents", Object::Reference(array_id))]);

        overlay_content(&mut doc, page_id, b"0 0 m".to_vec()).unwrap();

        let contents = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1], Object::Reference(body_id));

        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("BT ET"));
        assert!(text.contains("0 0 m"));
    }

    #[test]
    fn test_overlay_wraps_single_stream() {
        let mut doc = Document::with_version("1.7");
        let body_id = doc.add_object(Stream::new(Dictionary::new(), b"BT ET".to_vec()));
        let page_id = page_with(&mut doc, vec![("Contents", Object::Reference(body_id))]);

        overlay_content(&mut doc, page_id, b"0 0 m".to_vec()).unwrap();

        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        let body = text.find("BT ET").unwrap();
        assert!(text.find("q").unwrap() < body);
        assert!(text.find("0 0 m").unwrap() > body);
    }

    #[test]
    fn test_text_string_ascii_is_literal() {
        assert_eq!(
            text_string("Contents"),
            Object::String(b"Contents".to_vec(), StringFormat::Literal)
        );
    }

    #[test]
    fn test_text_string_unicode_is_utf16() {
        match text_string("日本") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x65, 0xE5, 0x67, 0x2C]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
