#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_bilingual::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Build a PDF whose pages draw `"{marker}-{n}"` with a shared font resource
pub fn create_test_pdf(num_pages: usize, marker: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::new();
    for n in 1..=num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td ({}-{}) Tj ET", marker, n);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // MediaBox and Resources are inherited from the page tree root
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        ),
        ("Resources", Object::Reference(resources_id)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

/// Single-page PDF with an indirect `/MediaBox` on the page tree root and an
/// indirect `/Contents` array on the page
pub fn create_indirect_test_pdf(marker: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let media_box_id = doc.add_object(Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(595),
        Object::Integer(842),
    ]));

    let content = format!("BT /F1 12 Tf 72 720 Td ({}-1) Tj ET", marker);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
    let contents_id = doc.add_object(Object::Array(vec![Object::Reference(content_id)]));

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(contents_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
        ("MediaBox", Object::Reference(media_box_id)),
        (
            "Resources",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Font",
                Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
            )])),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

/// Content stream bytes of the page at a 1-based page number
pub fn page_content(doc: &Document, page_number: u32) -> String {
    let page_id = doc.get_pages()[&page_number];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

pub fn toc_spec() -> TocSpec {
    TocSpec {
        title: "Quarterly Review".to_string(),
        title_secondary: Some("四半期レビュー".to_string()),
        client_name: Some("Acme".to_string()),
        date: "2026-10-01".to_string(),
        date_secondary: Some("2026年10月1日".to_string()),
    }
}

pub fn request(first_language: Language) -> BilingualRequest {
    BilingualRequest {
        html_first: "<h1>Hello</h1>".to_string(),
        html_second: "<h1>こんにちは</h1>".to_string(),
        toc: toc_spec(),
        options: None,
        first_language,
    }
}

/// Render client returning synthetic PDFs with fixed page counts
pub struct MockRenderClient {
    pub toc_pages: usize,
    pub pages_en: usize,
    pub pages_ja: usize,
    pub delay: Option<(Section, Duration)>,
    pub failing: Option<Section>,
    pub garbage: Option<Section>,
    pub calls: AtomicUsize,
}

impl MockRenderClient {
    pub fn new(toc_pages: usize, pages_en: usize, pages_ja: usize) -> Self {
        Self {
            toc_pages,
            pages_en,
            pages_ja,
            delay: None,
            failing: None,
            garbage: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, section: Section, delay: Duration) -> Self {
        self.delay = Some((section, delay));
        self
    }

    pub fn failing(mut self, section: Section) -> Self {
        self.failing = Some(section);
        self
    }

    pub fn garbage(mut self, section: Section) -> Self {
        self.garbage = Some(section);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The exact bytes this client returns for a section
    pub fn expected_bytes(&self, section: Section) -> Vec<u8> {
        match section {
            Section::Toc => create_test_pdf(self.toc_pages, "toc"),
            Section::Body(Language::En) => create_test_pdf(self.pages_en, "en"),
            Section::Body(Language::Ja) => create_test_pdf(self.pages_ja, "ja"),
        }
    }
}

#[async_trait]
impl RenderClient for MockRenderClient {
    async fn render(&self, section: Section, _request: RenderRequest) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some((delayed, delay)) = self.delay {
            if delayed == section {
                tokio::time::sleep(delay).await;
            }
        }
        if self.failing == Some(section) {
            return Err(BilingualError::Render {
                section,
                message: "renderer returned HTTP 502".to_string(),
            });
        }
        if self.garbage == Some(section) {
            return Ok(b"<html>not a pdf</html>".to_vec());
        }
        Ok(self.expected_bytes(section))
    }
}
