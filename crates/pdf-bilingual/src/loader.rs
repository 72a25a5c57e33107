//! Document loading and file I/O

use crate::types::*;
use lopdf::{Document, ObjectId};
use std::path::Path;

/// A rendered PDF parsed into an addressable page graph.
///
/// The original bytes are kept alongside the parsed document so the
/// per-language outputs can be returned exactly as the renderer produced them.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub section: Section,
    pub bytes: Vec<u8>,
    pub document: Document,
    /// Page object handles in page-number order
    pub page_ids: Vec<ObjectId>,
}

impl LoadedDocument {
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Parse rendered bytes into a page-addressable document.
///
/// Bytes that do not parse are a `MalformedDocument` error, not a render
/// error: the renderer answered, but with something that is not a PDF.
pub fn load_document(section: Section, bytes: Vec<u8>) -> Result<LoadedDocument> {
    let document = Document::load_mem(&bytes).map_err(|e| BilingualError::MalformedDocument {
        section,
        reason: e.to_string(),
    })?;

    // get_pages() is keyed by 1-based page number, so values come out in order
    let page_ids: Vec<ObjectId> = document.get_pages().values().copied().collect();

    log::debug!("Loaded {} with {} pages", section, page_ids.len());

    Ok(LoadedDocument {
        section,
        bytes,
        document,
        page_ids,
    })
}

/// Parse on a blocking thread
pub async fn load_document_async(section: Section, bytes: Vec<u8>) -> Result<LoadedDocument> {
    tokio::task::spawn_blocking(move || load_document(section, bytes)).await?
}

/// Read and parse a PDF from disk
pub async fn read_pdf(path: impl AsRef<Path>, section: Section) -> Result<LoadedDocument> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    load_document_async(section, bytes).await
}

/// Write serialized PDF bytes to disk
pub async fn write_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    Ok(())
}
