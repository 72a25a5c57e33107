//! Generation pipeline
//!
//! ```text
//! Requested → Rendering → Loaded → OffsetsComputed → Assembled → Linked
//!           → Serialized → Returned
//! ```
//!
//! Any stage can end in `Failed(kind)`. The three renders run concurrently;
//! the first failure cancels the others and no partial output is produced.

use crate::assemble::assemble;
use crate::link::{attach_links, plan_links};
use crate::loader::load_document;
use crate::offsets::compute_ranges;
use crate::options::{EngineConfig, RenderOptions, TocStrategy};
use crate::outline::build_outline;
use crate::render::{HttpRenderClient, RenderClient, RenderRequest};
use crate::serialize::{BilingualOutput, serialize};
use crate::stamp::stamp_page_numbers;
use crate::toc::{DrawnTocRenderer, HtmlTocRenderer, TocLayout, TocRenderer};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// Request
// ============================================================================

/// One generation request
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilingualRequest {
    /// English body HTML
    pub html_first: String,
    /// Japanese body HTML
    pub html_second: String,
    pub toc: TocSpec,
    #[serde(default)]
    pub options: Option<RenderOptions>,
    /// Language placed directly after the TOC
    #[serde(default)]
    pub first_language: Language,
}

impl BilingualRequest {
    /// Check the request before any render call is made
    pub fn validate(&self, max_html_bytes: usize) -> Result<()> {
        for (field, html) in [
            ("htmlFirst", &self.html_first),
            ("htmlSecond", &self.html_second),
        ] {
            if html.trim().is_empty() {
                return Err(BilingualError::Validation(format!("{} is required", field)));
            }
            if html.len() > max_html_bytes {
                return Err(BilingualError::PayloadTooLarge {
                    field,
                    size: html.len(),
                    limit: max_html_bytes,
                });
            }
        }
        self.toc.validate(crate::constants::MAX_TOC_FIELD_BYTES)?;
        if let Some(options) = &self.options {
            options.validate()?;
        }
        Ok(())
    }
}

impl fmt::Debug for BilingualRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BilingualRequest")
            .field("html_first_bytes", &self.html_first.len())
            .field("html_second_bytes", &self.html_second.len())
            .field("toc", &self.toc)
            .field("options", &self.options)
            .field("first_language", &self.first_language)
            .finish()
    }
}

/// Raw render results, before loading
#[derive(Debug, Clone)]
pub struct RenderedSet {
    pub toc: Vec<u8>,
    pub english: Vec<u8>,
    pub japanese: Vec<u8>,
}

/// Pipeline stage, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Requested,
    Rendering,
    Loaded,
    OffsetsComputed,
    Assembled,
    Linked,
    Serialized,
    Returned,
    Failed(ErrorKind),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Requested => f.write_str("requested"),
            Stage::Rendering => f.write_str("rendering"),
            Stage::Loaded => f.write_str("loaded"),
            Stage::OffsetsComputed => f.write_str("offsets_computed"),
            Stage::Assembled => f.write_str("assembled"),
            Stage::Linked => f.write_str("linked"),
            Stage::Serialized => f.write_str("serialized"),
            Stage::Returned => f.write_str("returned"),
            Stage::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

fn enter(stage: Stage) {
    log::debug!("stage: {}", stage);
}

// ============================================================================
// Engine
// ============================================================================

/// Renders, assembles and links bilingual documents
pub struct BilingualEngine {
    client: Arc<dyn RenderClient>,
    toc_renderer: Arc<dyn TocRenderer>,
    config: EngineConfig,
}

impl BilingualEngine {
    /// Engine with the TOC strategy chosen by `config`
    pub fn new(client: Arc<dyn RenderClient>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let toc_renderer: Arc<dyn TocRenderer> = match config.toc_strategy {
            TocStrategy::Html => Arc::new(HtmlTocRenderer::new(client.clone(), &config)),
            TocStrategy::Drawn => Arc::new(DrawnTocRenderer::new()),
        };
        Ok(Self {
            client,
            toc_renderer,
            config,
        })
    }

    /// Engine talking to the configured HTTP rendering service
    pub fn http(config: EngineConfig) -> Result<Self> {
        let client = Arc::new(HttpRenderClient::new(&config)?);
        Self::new(client, config)
    }

    pub fn with_toc_renderer(mut self, toc_renderer: Arc<dyn TocRenderer>) -> Self {
        self.toc_renderer = toc_renderer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a request end to end
    pub async fn generate(&self, request: BilingualRequest) -> Result<BilingualOutput> {
        let started = Instant::now();
        match self.run(request).await {
            Ok(output) => {
                enter(Stage::Returned);
                log::info!(
                    "Generated {} pages (toc {}, {} {}, {} {}) in {:?}",
                    output.page_info.total_pages,
                    output.page_info.toc_pages,
                    output.first_language,
                    output.page_info.first_pages,
                    output.first_language.other(),
                    output.page_info.second_pages,
                    started.elapsed()
                );
                Ok(output)
            }
            Err(e) => {
                let stage = Stage::Failed(e.kind());
                match e.kind() {
                    ErrorKind::Validation | ErrorKind::PayloadTooLarge => {
                        log::warn!("Request rejected ({}): {}", stage, e)
                    }
                    _ => log::error!("Generation failed ({}): {}", stage, e),
                }
                Err(e)
            }
        }
    }

    async fn run(&self, request: BilingualRequest) -> Result<BilingualOutput> {
        enter(Stage::Requested);
        request.validate(self.config.max_html_bytes)?;

        let BilingualRequest {
            html_first,
            html_second,
            toc,
            options,
            first_language,
        } = request;
        let options = options.unwrap_or_default();
        let layout = TocLayout::new(&options, first_language)?;

        let limit = self.config.max_html_bytes;
        let english = RenderRequest::new("htmlFirst", html_first, options.clone(), limit)?;
        let japanese = RenderRequest::new("htmlSecond", html_second, options, limit)?;

        enter(Stage::Rendering);
        let after = self.config.render_timeout();
        let english_section = Section::Body(Language::En);
        let japanese_section = Section::Body(Language::Ja);

        let (english, japanese, toc_bytes) = tokio::try_join!(
            bounded(
                english_section,
                after,
                self.client.render(english_section, english)
            ),
            bounded(
                japanese_section,
                after,
                self.client.render(japanese_section, japanese)
            ),
            bounded(Section::Toc, after, self.toc_renderer.render(&toc, &layout)),
        )?;

        let rendered = RenderedSet {
            toc: toc_bytes,
            english,
            japanese,
        };
        assemble_rendered(rendered, toc, first_language, layout).await
    }
}

/// Apply the per-render deadline
async fn bounded<F>(section: Section, after: Duration, render: F) -> Result<Vec<u8>>
where
    F: Future<Output = Result<Vec<u8>>>,
{
    match tokio::time::timeout(after, render).await {
        Ok(result) => result,
        Err(_) => Err(BilingualError::Timeout { section, after }),
    }
}

// ============================================================================
// Assembly stages
// ============================================================================

/// Load, assemble, link and serialize already-rendered documents
pub async fn assemble_rendered(
    rendered: RenderedSet,
    toc: TocSpec,
    first_language: Language,
    layout: TocLayout,
) -> Result<BilingualOutput> {
    // PDF work is CPU-bound, spawn blocking
    tokio::task::spawn_blocking(move || {
        assemble_rendered_blocking(rendered, &toc, first_language, &layout)
    })
    .await?
}

/// Synchronous form of [`assemble_rendered`]
pub fn assemble_rendered_blocking(
    rendered: RenderedSet,
    toc: &TocSpec,
    first_language: Language,
    layout: &TocLayout,
) -> Result<BilingualOutput> {
    let toc_doc = load_document(Section::Toc, rendered.toc)?;
    let english = load_document(Section::Body(Language::En), rendered.english)?;
    let japanese = load_document(Section::Body(Language::Ja), rendered.japanese)?;
    enter(Stage::Loaded);

    let ranges = compute_ranges(
        toc_doc.page_count(),
        english.page_count(),
        japanese.page_count(),
        first_language,
    )?;
    enter(Stage::OffsetsComputed);

    let (first, second) = match first_language {
        Language::En => (english, japanese),
        Language::Ja => (japanese, english),
    };

    let mut assembled = assemble(&toc_doc, &first, &second, &ranges)?;
    drop(toc_doc);
    stamp_page_numbers(&mut assembled, layout)?;
    enter(Stage::Assembled);

    let links = plan_links(layout, &ranges);
    let mut warnings = attach_links(&mut assembled, layout, &links).warnings;
    if let Err(e) = build_outline(&mut assembled, toc) {
        let warning = AnnotationWarning {
            section: Section::Toc,
            reason: format!("outline not built: {}", e),
        };
        log::warn!("{}", warning);
        warnings.push(warning);
    }
    enter(Stage::Linked);

    let combined = serialize(assembled, toc)?;
    enter(Stage::Serialized);

    Ok(BilingualOutput {
        combined,
        first_language_doc: first.into_bytes(),
        second_language_doc: second.into_bytes(),
        page_info: ranges.page_info(),
        first_language,
        warnings,
    })
}
