use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BilingualError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("{field} is {size} bytes, limit is {limit} bytes")]
    PayloadTooLarge {
        field: &'static str,
        size: usize,
        limit: usize,
    },
    #[error("Section {0} has no pages")]
    EmptySection(Section),
    #[error("Render of {section} failed: {message}")]
    Render { section: Section, message: String },
    #[error("Render of {section} timed out after {after:?}")]
    Timeout { section: Section, after: Duration },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rendered {section} is not a valid PDF: {reason}")]
    MalformedDocument { section: Section, reason: String },
    #[error("Assembly failed: {0}")]
    Assembly(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BilingualError>;

/// Machine-readable failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    PayloadTooLarge,
    Render,
    MalformedDocument,
    Assembly,
    Config,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::PayloadTooLarge => "payload_too_large",
            ErrorKind::Render => "render",
            ErrorKind::MalformedDocument => "malformed_document",
            ErrorKind::Assembly => "assembly",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BilingualError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::EmptySection(_) => ErrorKind::Validation,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::Render { .. } | Self::Timeout { .. } | Self::Http(_) => ErrorKind::Render,
            Self::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            Self::Assembly(_) | Self::Pdf(_) | Self::TaskJoin(_) => ErrorKind::Assembly,
            Self::Io(_) | Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Body language of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (language A)
    #[default]
    #[serde(alias = "EN")]
    En,
    /// Japanese (language B)
    #[serde(alias = "JA")]
    Ja,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Label in the language itself
    pub fn native_label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "日本語",
        }
    }

    /// Label that builtin PDF fonts can draw
    pub fn latin_label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "Japanese",
        }
    }

    pub fn other(self) -> Language {
        match self {
            Language::En => Language::Ja,
            Language::Ja => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A contiguous block of pages in the combined document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Toc,
    Body(Language),
}

impl Section {
    pub fn tag(self) -> &'static str {
        match self {
            Section::Toc => "toc",
            Section::Body(language) => language.tag(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Absolute 1-based page range of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub section: Section,
    pub start_page: usize,
    pub page_count: usize,
}

impl PageRange {
    /// Last page of the range (equal to `start_page` for a 1-page section)
    pub fn end_page(&self) -> usize {
        self.start_page + self.page_count - 1
    }

    /// 0-based index of the first page in the combined document
    pub fn first_index(&self) -> usize {
        self.start_page - 1
    }

    /// 0-based indices covered by this range
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.first_index()..self.first_index() + self.page_count
    }

    pub fn contains(&self, page: usize) -> bool {
        page >= self.start_page && page <= self.end_page()
    }
}

/// Section boundaries of the combined document, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRanges {
    pub toc: PageRange,
    pub first: PageRange,
    pub second: PageRange,
}

impl SectionRanges {
    pub fn total_pages(&self) -> usize {
        self.toc.page_count + self.first.page_count + self.second.page_count
    }

    pub fn first_language(&self) -> Language {
        match self.first.section {
            Section::Body(language) => language,
            Section::Toc => Language::default(),
        }
    }

    pub fn for_language(&self, language: Language) -> &PageRange {
        if self.first.section == Section::Body(language) {
            &self.first
        } else {
            &self.second
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageRange> {
        [&self.toc, &self.first, &self.second].into_iter()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            toc_pages: self.toc.page_count,
            first_pages: self.first.page_count,
            second_pages: self.second.page_count,
            total_pages: self.total_pages(),
        }
    }
}

/// Page-count metadata returned with every combined document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub toc_pages: usize,
    pub first_pages: usize,
    pub second_pages: usize,
    pub total_pages: usize,
}

/// What the TOC page should display
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocSpec {
    pub title: String,
    #[serde(default)]
    pub title_secondary: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    pub date: String,
    #[serde(default)]
    pub date_secondary: Option<String>,
}

impl TocSpec {
    /// Check required fields and per-field length bounds
    pub fn validate(&self, max_field_bytes: usize) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BilingualError::Validation("toc.title is required".to_string()));
        }
        if self.date.trim().is_empty() {
            return Err(BilingualError::Validation("toc.date is required".to_string()));
        }

        let fields: [(&'static str, Option<&str>); 5] = [
            ("toc.title", Some(self.title.as_str())),
            ("toc.titleSecondary", self.title_secondary.as_deref()),
            ("toc.clientName", self.client_name.as_deref()),
            ("toc.date", Some(self.date.as_str())),
            ("toc.dateSecondary", self.date_secondary.as_deref()),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value.len() > max_field_bytes {
                    return Err(BilingualError::PayloadTooLarge {
                        field,
                        size: value.len(),
                        limit: max_field_bytes,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Rectangle in PDF user space (points, bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Where the viewer lands on the target page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPosition {
    /// Top-left corner at the current zoom
    #[default]
    Top,
    /// Whole page fitted to the window
    Fit,
}

/// A clickable region on a TOC page pointing into the combined document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkAnnotation {
    pub source_page_index: usize,
    pub rect: Rect,
    pub target_page_index: usize,
    pub target_position: TargetPosition,
    pub section: Section,
}

/// A navigation aid that could not be attached; the document still ships
#[derive(Error, Debug, Clone, PartialEq)]
#[error("link to {section} skipped: {reason}")]
pub struct AnnotationWarning {
    pub section: Section,
    pub reason: String,
}
