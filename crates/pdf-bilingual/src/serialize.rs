//! Serialization of the combined document and the response envelope

use crate::assemble::AssembledDocument;
use crate::page::text_string;
use crate::types::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lopdf::{Dictionary, Object};
use serde::{Deserialize, Serialize};

const PRODUCER: &str = concat!("pdf-bilingual ", env!("CARGO_PKG_VERSION"));

/// Write the combined document to bytes.
///
/// No timestamps or random identifiers are written, so the same inputs
/// always produce the same bytes.
pub fn serialize(assembled: AssembledDocument, toc: &TocSpec) -> Result<Vec<u8>> {
    let mut document = assembled.document;

    let mut info = Dictionary::new();
    info.set("Title", text_string(toc.title.trim()));
    info.set("Producer", Object::string_literal(PRODUCER));
    let info_id = document.add_object(info);
    document.trailer.set("Info", Object::Reference(info_id));

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Everything a successful generation returns
#[derive(Debug, Clone)]
pub struct BilingualOutput {
    /// TOC, first language and second language, linked
    pub combined: Vec<u8>,
    /// Body of the language placed first, exactly as rendered
    pub first_language_doc: Vec<u8>,
    /// Body of the language placed second, exactly as rendered
    pub second_language_doc: Vec<u8>,
    pub page_info: PageInfo,
    pub first_language: Language,
    pub warnings: Vec<AnnotationWarning>,
}

impl BilingualOutput {
    /// Transport form with base64 document payloads
    pub fn encode(&self) -> EncodedOutput {
        EncodedOutput {
            combined: STANDARD.encode(&self.combined),
            first_language_doc: STANDARD.encode(&self.first_language_doc),
            second_language_doc: STANDARD.encode(&self.second_language_doc),
            page_info: self.page_info,
            first_language: self.first_language,
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// JSON response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedOutput {
    pub combined: String,
    pub first_language_doc: String,
    pub second_language_doc: String,
    pub page_info: PageInfo,
    pub first_language: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Decode one base64 document payload
pub fn decode_document(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| BilingualError::Validation(format!("invalid base64 document: {}", e)))
}
