use anyhow::Result;
use clap::{Parser, ValueEnum};
use pdf_bilingual::{BilingualEngine, EngineConfig, TocStrategy};
use pdf_bilingual_server::{build_router, state::AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdf-bilingual-server",
    about = "Bilingual document assembly service",
    version
)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BILINGUAL_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Engine configuration file (JSON)
    #[arg(long, env = "BILINGUAL_CONFIG")]
    config: Option<PathBuf>,

    /// HTML-to-PDF service endpoint
    #[arg(long, env = "BILINGUAL_RENDER_URL")]
    render_url: Option<String>,

    /// Bearer token for the rendering service
    #[arg(long, env = "BILINGUAL_RENDER_TOKEN", hide_env_values = true)]
    render_token: Option<String>,

    /// Key clients must send in X-API-Key
    #[arg(long, env = "BILINGUAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// How the TOC page is produced
    #[arg(long, env = "BILINGUAL_TOC_STRATEGY", value_enum)]
    toc_strategy: Option<TocStrategyArg>,

    /// Per-render deadline in milliseconds
    #[arg(long, env = "BILINGUAL_RENDER_TIMEOUT_MS")]
    render_timeout_ms: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TocStrategyArg {
    Html,
    Drawn,
}

impl From<TocStrategyArg> for TocStrategy {
    fn from(arg: TocStrategyArg) -> Self {
        match arg {
            TocStrategyArg::Html => TocStrategy::Html,
            TocStrategyArg::Drawn => TocStrategy::Drawn,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path).await?,
        None => EngineConfig::default(),
    };
    if let Some(url) = args.render_url {
        config.render_url = url;
    }
    if let Some(token) = args.render_token {
        config.api_token = Some(token);
    }
    if let Some(strategy) = args.toc_strategy {
        config.toc_strategy = strategy.into();
    }
    if let Some(timeout) = args.render_timeout_ms {
        config.render_timeout_ms = timeout;
    }

    log::info!(
        "Rendering via {} (TOC strategy {:?}, timeout {:?})",
        config.render_url,
        config.toc_strategy,
        config.render_timeout()
    );

    let engine = BilingualEngine::http(config)?;
    if args.api_key.is_none() {
        log::warn!("No API key configured; requests are not authenticated");
    }

    let app = build_router(AppState::new(engine, args.api_key));

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    log::info!("Listening on {}", args.bind);
    log::info!("  - POST /api/v1/bilingual");
    log::info!("  - GET  /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
