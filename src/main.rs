//! Storefront crawler command line entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

use storefront_crawler::application::{CrawlReporter, ExportService, PaginationController, TracingReporter};
use storefront_crawler::infrastructure::logging::{init_logging_with_config, log_system_info};
use storefront_crawler::infrastructure::{
    AppConfig, ChromiumRenderer, PageLoader, PageLoaderConfig, ProductListParser,
};

/// Scrape every product of a paginated storefront listing into a CSV file
#[derive(Parser, Debug)]
#[command(name = "storefront-crawler", version, about)]
struct Cli {
    /// First listing page to crawl
    start_url: String,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to ./storefront.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Log level or filter directive, e.g. "debug"
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(max_pages) = self.max_pages {
            config.crawl.max_pages = Some(max_pages);
        }
        if let Some(output) = &self.output {
            config.export.output_path.clone_from(output);
        }
        if self.headful {
            config.browser.headless = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging_with_config(&config.logging)?;
    log_system_info();

    Url::parse(&cli.start_url).with_context(|| format!("Invalid start URL '{}'", cli.start_url))?;
    info!("🚀 Starting crawl at {}", cli.start_url);

    // Built before the browser starts so a bad selector never leaves a session behind
    let parser = ProductListParser::from_config(&config.parsing_config())?;
    let loader = PageLoader::new(PageLoaderConfig::from(&config));
    let reporter: Arc<dyn CrawlReporter> = Arc::new(TracingReporter);

    let renderer = ChromiumRenderer::launch(
        &config.browser,
        Duration::from_millis(config.crawl.element_poll_ms),
    )
    .await?;

    let outcome = PaginationController::new(renderer, loader, parser, Arc::clone(&reporter))
        .with_page_delay(config.crawl.page_delay())
        .run(&cli.start_url, config.crawl.max_pages)
        .await
        .inspect_err(|e| {
            warn!(
                "Discarding {} products scraped before the failure",
                e.partial_records().len()
            );
        })?;

    ExportService::from_config(&config, reporter).export(&outcome.records)?;
    Ok(())
}
