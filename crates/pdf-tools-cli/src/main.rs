use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_bilingual::{
    BilingualEngine, BilingualOutput, BilingualRequest, DrawnTocRenderer, EngineConfig, Language,
    Orientation, PaperSize, RenderOptions, RenderedSet, Section, TocLayout, TocSpec, TocStrategy,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render English and Japanese HTML and build the linked bilingual PDF
    Bilingual {
        /// English body HTML file
        #[arg(long)]
        en: PathBuf,

        /// Japanese body HTML file
        #[arg(long)]
        ja: PathBuf,

        /// Directory for combined.pdf and the two language PDFs
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// HTML-to-PDF service endpoint (overrides the config file)
        #[arg(long, env = "BILINGUAL_RENDER_URL")]
        render_url: Option<String>,

        /// How the TOC page is produced (overrides the config file)
        #[arg(long, value_enum)]
        toc_strategy: Option<TocStrategyArg>,

        #[command(flatten)]
        toc: TocArgs,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Assemble already-rendered TOC, English and Japanese PDFs
    Assemble {
        /// TOC PDF (rendered without page numbers)
        #[arg(long)]
        toc_pdf: PathBuf,

        /// English body PDF
        #[arg(long)]
        en: PathBuf,

        /// Japanese body PDF
        #[arg(long)]
        ja: PathBuf,

        /// Output combined PDF
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        toc: TocArgs,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Print the page ranges each section would occupy
    Ranges {
        #[arg(long, default_value = "1")]
        toc_pages: usize,

        #[arg(long)]
        en_pages: usize,

        #[arg(long)]
        ja_pages: usize,

        /// Language placed directly after the TOC
        #[arg(long, default_value = "en", value_enum)]
        first_language: LanguageArg,
    },

    /// Draw a TOC page locally with builtin fonts
    Toc {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        toc: TocArgs,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Args)]
struct TocArgs {
    /// TOC title
    #[arg(long)]
    title: String,

    /// Secondary (translated) title
    #[arg(long)]
    title_secondary: Option<String>,

    /// Client name
    #[arg(long)]
    client: Option<String>,

    /// Date line
    #[arg(long)]
    date: String,

    /// Secondary (translated) date line
    #[arg(long)]
    date_secondary: Option<String>,

    /// Language placed directly after the TOC
    #[arg(long, default_value = "en", value_enum)]
    first_language: LanguageArg,
}

#[derive(Args)]
struct PageArgs {
    /// Paper size
    #[arg(long, default_value = "a4", value_enum)]
    paper: PaperArg,

    /// Page orientation
    #[arg(long, default_value = "portrait", value_enum)]
    orientation: OrientationArg,

    /// Page margin in mm (uniform on all sides)
    #[arg(long, default_value = "10.0")]
    margin: f32,
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    En,
    Ja,
}

#[derive(Clone, Copy, ValueEnum)]
enum TocStrategyArg {
    Html,
    Drawn,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Self::En,
            LanguageArg::Ja => Self::Ja,
        }
    }
}

impl From<TocStrategyArg> for TocStrategy {
    fn from(arg: TocStrategyArg) -> Self {
        match arg {
            TocStrategyArg::Html => Self::Html,
            TocStrategyArg::Drawn => Self::Drawn,
        }
    }
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl TocArgs {
    fn metadata(&self) -> TocSpec {
        TocSpec {
            title: self.title.clone(),
            title_secondary: self.title_secondary.clone(),
            client_name: self.client.clone(),
            date: self.date.clone(),
            date_secondary: self.date_secondary.clone(),
        }
    }
}

impl PageArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            format: self.paper.into(),
            orientation: self.orientation.into(),
            margins: pdf_bilingual::PageMargins::uniform(self.margin),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bilingual {
            en,
            ja,
            output_dir,
            config,
            render_url,
            toc_strategy,
            toc,
            page,
        } => {
            let mut engine_config = match &config {
                Some(path) => EngineConfig::load(path).await?,
                None => EngineConfig::default(),
            };
            if let Some(url) = render_url {
                engine_config.render_url = url;
            }
            if let Some(strategy) = toc_strategy {
                engine_config.toc_strategy = strategy.into();
            }

            let request = BilingualRequest {
                html_first: read_html(&en).await?,
                html_second: read_html(&ja).await?,
                toc: toc.metadata(),
                options: Some(page.options()),
                first_language: toc.first_language.into(),
            };

            log::info!(
                "Rendering {} and {} via {} ({:?} TOC)",
                en.display(),
                ja.display(),
                engine_config.render_url,
                engine_config.toc_strategy
            );
            let engine = BilingualEngine::http(engine_config)?;
            let output = engine.generate(request).await?;
            write_outputs(&output, &output_dir).await?;
        }

        Commands::Assemble {
            toc_pdf,
            en,
            ja,
            output,
            toc,
            page,
        } => {
            let metadata = toc.metadata();
            metadata.validate(pdf_bilingual::constants::MAX_TOC_FIELD_BYTES)?;
            let first_language: Language = toc.first_language.into();
            let layout = TocLayout::new(&page.options(), first_language)?;

            let rendered = RenderedSet {
                toc: read_pdf_bytes(&toc_pdf).await?,
                english: read_pdf_bytes(&en).await?,
                japanese: read_pdf_bytes(&ja).await?,
            };
            log::info!(
                "Assembling {} with {} and {}",
                toc_pdf.display(),
                en.display(),
                ja.display()
            );
            let result =
                pdf_bilingual::assemble_rendered(rendered, metadata, first_language, layout).await?;

            pdf_bilingual::write_pdf(&result.combined, &output).await?;
            print_summary(&result);
            println!("Combined → {}", output.display());
        }

        Commands::Ranges {
            toc_pages,
            en_pages,
            ja_pages,
            first_language,
        } => {
            let ranges =
                pdf_bilingual::compute_ranges(toc_pages, en_pages, ja_pages, first_language.into())?;
            println!("Section ranges:");
            for range in ranges.iter() {
                println!(
                    "  {:<4} {}",
                    range.section,
                    pdf_bilingual::format_page_range(range)
                );
            }
            println!("  Total pages: {}", ranges.total_pages());
        }

        Commands::Toc { output, toc, page } => {
            let metadata = toc.metadata();
            let layout = TocLayout::new(&page.options(), toc.first_language.into())?;
            let bytes = DrawnTocRenderer::new().draw(&metadata, &layout)?;
            pdf_bilingual::write_pdf(&bytes, &output).await?;
            println!("TOC → {}", output.display());
        }
    }

    Ok(())
}

async fn read_html(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn read_pdf_bytes(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn write_outputs(output: &BilingualOutput, dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    let first = output.first_language;
    let files = [
        ("combined.pdf".to_string(), &output.combined),
        (format!("{}.pdf", first.tag()), &output.first_language_doc),
        (
            format!("{}.pdf", first.other().tag()),
            &output.second_language_doc,
        ),
    ];
    for (name, bytes) in files {
        log::debug!("Writing {} ({} bytes)", name, bytes.len());
        pdf_bilingual::write_pdf(bytes, dir.join(&name)).await?;
    }

    print_summary(output);
    println!("Written to {}", dir.display());
    Ok(())
}

fn print_summary(output: &BilingualOutput) {
    let info = &output.page_info;
    println!("Bilingual document:");
    println!("  TOC pages: {}", info.toc_pages);
    println!(
        "  {} pages: {}",
        Section::Body(output.first_language),
        info.first_pages
    );
    println!(
        "  {} pages: {}",
        Section::Body(output.first_language.other()),
        info.second_pages
    );
    println!("  Total pages: {}", info.total_pages);
    for warning in &output.warnings {
        log::warn!("{}", warning);
    }
}
