//! Deep copy of pages between documents

use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes that may live on an ancestor `Pages` node instead of the page
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose `Parent` chain loops
const MAX_TREE_DEPTH: usize = 64;

/// Copies objects from one source document into the target document.
///
/// Every indirect reference reachable from a copied page is copied once and
/// remapped to a fresh target handle. Handles are registered before recursing
/// so reference cycles terminate. One copier serves exactly one source
/// document, since object ids of different sources collide.
///
/// Named destinations (`/Dest (name)` on link annotations, `/D (name)` on
/// GoTo actions) are replaced by the explicit destination they name in the
/// source catalog. The source name tree does not come along, and the two
/// language bodies may reuse the same anchor names.
pub(crate) struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
    named: HashMap<Vec<u8>, Object>,
}

impl<'a> ObjectCopier<'a> {
    pub fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
            named: named_destinations(source),
        }
    }

    /// Allocate the target handle for a source object ahead of copying it.
    ///
    /// Reserving all pages of a source first means references between its
    /// pages (link destinations, annotation `/P` entries) land on the copies.
    pub fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        if let Some(&target_id) = self.id_map.get(&source_id) {
            return target_id;
        }
        let target_id = self.target.new_object_id();
        self.id_map.insert(source_id, target_id);
        target_id
    }

    /// Copy a page dictionary and everything it depends on.
    ///
    /// `/Parent` is never followed; it is re-pointed at `parent` in the
    /// target. Inherited attributes are materialised on the copy because the
    /// source page tree does not come along.
    pub fn copy_page(&mut self, source_page: ObjectId, parent: ObjectId) -> Result<ObjectId> {
        let target_id = self.reserve(source_page);

        let mut page = self
            .source
            .get_dictionary(source_page)
            .map_err(|e| {
                BilingualError::Assembly(format!(
                    "page {:?} is not a dictionary: {}",
                    source_page, e
                ))
            })?
            .clone();
        page.remove(b"Parent");

        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Some(value) = self.inherited_attribute(source_page, key)? {
                    page.set(key.to_vec(), value);
                }
            }
        }
        if !page.has(b"Resources") {
            page.set("Resources", Object::Dictionary(Dictionary::new()));
        }

        let mut page = self.remap_dictionary(page)?;
        page.set("Parent", Object::Reference(parent));
        self.target
            .objects
            .insert(target_id, Object::Dictionary(page));

        Ok(target_id)
    }

    /// Look up an attribute on the ancestors of a page
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
        let mut current = self.source.get_dictionary(page_id)?;
        for _ in 0..MAX_TREE_DEPTH {
            let parent_id = match current.get(b"Parent").and_then(Object::as_reference) {
                Ok(id) => id,
                Err(_) => return Ok(None),
            };
            let parent = self.source.get_dictionary(parent_id)?;
            if let Ok(value) = parent.get(key) {
                return Ok(Some(value.clone()));
            }
            current = parent;
        }
        Err(BilingualError::Assembly(format!(
            "page tree above {:?} is deeper than {} levels",
            page_id, MAX_TREE_DEPTH
        )))
    }

    /// Copy a referenced object, returning its handle in the target
    fn copy_reference(&mut self, source_id: ObjectId) -> Result<ObjectId> {
        if let Some(&target_id) = self.id_map.get(&source_id) {
            return Ok(target_id);
        }

        let target_id = self.reserve(source_id);
        let object = self
            .source
            .get_object(source_id)
            .map_err(|_| {
                BilingualError::Assembly(format!(
                    "unresolved reference {} {} R",
                    source_id.0, source_id.1
                ))
            })?
            .clone();
        let copied = self.remap(object)?;
        self.target.objects.insert(target_id, copied);

        Ok(target_id)
    }

    fn remap(&mut self, object: Object) -> Result<Object> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.copy_reference(id)?)),
            Object::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.remap(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Object::Array(items))
            }
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.remap_dictionary(dict)?)),
            Object::Stream(mut stream) => {
                // Content bytes are copied verbatim, filters included
                stream.dict = self.remap_dictionary(stream.dict)?;
                Ok(Object::Stream(stream))
            }
            // Primitive types: just move
            other => Ok(other),
        }
    }

    fn remap_dictionary(&mut self, mut dict: Dictionary) -> Result<Dictionary> {
        self.resolve_named_destination(&mut dict);
        for (_, value) in dict.iter_mut() {
            let original = std::mem::replace(value, Object::Null);
            *value = self.remap(original)?;
        }
        Ok(dict)
    }

    fn resolve_named_destination(&self, dict: &mut Dictionary) {
        let is_goto = matches!(dict.get(b"S"), Ok(Object::Name(kind)) if kind == b"GoTo");
        let key: &[u8] = if is_goto { b"D" } else { b"Dest" };
        let name = match dict.get(key) {
            Ok(Object::String(name, _)) | Ok(Object::Name(name)) => name.clone(),
            _ => return,
        };
        match self.named.get(&name) {
            Some(explicit) => dict.set(key.to_vec(), explicit.clone()),
            None => log::debug!(
                "Named destination {:?} not found in source catalog",
                String::from_utf8_lossy(&name)
            ),
        }
    }
}

// ============================================================================
// Named destinations
// ============================================================================

/// Collect the named destinations of a document as explicit destination arrays.
///
/// Both the PDF 1.1 `/Dests` dictionary and the `/Names /Dests` name tree are
/// read. Malformed entries are skipped.
fn named_destinations(doc: &Document) -> HashMap<Vec<u8>, Object> {
    let mut named = HashMap::new();
    let Ok(catalog) = doc.catalog() else {
        return named;
    };

    if let Some(dests) = resolve_dictionary(doc, catalog.get(b"Dests").ok()) {
        for (name, value) in dests.iter() {
            if let Some(explicit) = explicit_destination(doc, value) {
                named.insert(name.clone(), explicit);
            }
        }
    }

    let tree = resolve_dictionary(doc, catalog.get(b"Names").ok())
        .and_then(|names| resolve_dictionary(doc, names.get(b"Dests").ok()));
    if let Some(root) = tree {
        collect_name_tree(doc, root, 0, &mut named);
    }
    named
}

fn collect_name_tree(
    doc: &Document,
    node: &Dictionary,
    depth: usize,
    named: &mut HashMap<Vec<u8>, Object>,
) {
    if depth >= MAX_TREE_DEPTH {
        log::warn!("Name tree deeper than {} levels; ignoring the rest", MAX_TREE_DEPTH);
        return;
    }

    if let Some(pairs) = resolve_array(doc, node.get(b"Names").ok()) {
        for pair in pairs.chunks(2) {
            let [key, value] = pair else { continue };
            let Ok((_, Object::String(name, _))) = doc.dereference(key) else {
                continue;
            };
            if let Some(explicit) = explicit_destination(doc, value) {
                named.insert(name.clone(), explicit);
            }
        }
    }

    if let Some(kids) = resolve_array(doc, node.get(b"Kids").ok()) {
        for kid in kids {
            if let Some(child) = resolve_dictionary(doc, Some(kid)) {
                collect_name_tree(doc, child, depth + 1, named);
            }
        }
    }
}

/// A destination value is either an array or a dictionary carrying `/D`
fn explicit_destination(doc: &Document, value: &Object) -> Option<Object> {
    match doc.dereference(value).ok()?.1 {
        array @ Object::Array(_) => Some(array.clone()),
        Object::Dictionary(dict) => match doc.dereference(dict.get(b"D").ok()?).ok()?.1 {
            array @ Object::Array(_) => Some(array.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn resolve_dictionary<'d>(
    doc: &'d Document,
    entry: Option<&'d Object>,
) -> Option<&'d Dictionary> {
    doc.dereference(entry?).ok()?.1.as_dict().ok()
}

fn resolve_array<'d>(doc: &'d Document, entry: Option<&'d Object>) -> Option<&'d Vec<Object>> {
    doc.dereference(entry?).ok()?.1.as_array().ok()
}
