// Copyright 2026 imdb-reviews contributors
// SPDX-License-Identifier: MIT

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use imdb_reviews::Catalog;
use tracing::warn;

use imdb_reviews_cli::collector::{CollectorConfig, DEFAULT_BASE_URL};
use imdb_reviews_cli::config::{resolve_catalog_path, resolve_output_dir, Settings};
use imdb_reviews_cli::progress;
use imdb_reviews_cli::renderer::chromium::ChromiumRenderer;

#[derive(Parser)]
#[command(
    name = "imdb-reviews",
    about = "Fetch all IMDb user reviews of a movie and save them as JSON",
    version
)]
struct Cli {
    /// IMDb movie ID (e.g. tt0111161) or (partial) title
    #[arg(value_name = "QUERY")]
    query: Vec<String>,

    /// Path to the movie catalog JSON file
    #[arg(long)]
    catalog: Option<String>,

    /// Directory for the review file
    #[arg(long, short)]
    output_dir: Option<String>,

    /// Pause between "load more" clicks in milliseconds
    #[arg(long, default_value = "2000")]
    delay_ms: u64,

    /// Navigation timeout in milliseconds
    #[arg(long, default_value = "30000")]
    nav_timeout_ms: u64,

    /// Stop after this many "load more" clicks
    #[arg(long)]
    max_pages: Option<u32>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headful: bool,

    /// Base URL of the title pages
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();

    // 0=success, 1=error
    if let Err(e) = execute(cli).await {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn execute(cli: Cli) -> Result<()> {
    let query = cli.query.join(" ");
    let catalog = load_catalog(cli.catalog.as_deref())?;

    let settings = Settings {
        collector: CollectorConfig {
            base_url: cli.base_url,
            fetch_delay: Duration::from_millis(cli.delay_ms),
            nav_timeout_ms: cli.nav_timeout_ms,
            max_pages: cli.max_pages,
            ..CollectorConfig::default()
        },
        headless: !cli.headful,
        output_dir: resolve_output_dir(cli.output_dir.as_deref()),
    };

    let (tx, rx) = progress::channel();
    let printer = tokio::spawn(async move { progress::report(rx, &mut std::io::stdout()).await });

    let headless = settings.headless;
    let result = imdb_reviews_cli::run(
        &query,
        &catalog,
        || ChromiumRenderer::launch(headless),
        &settings,
        Some(tx),
    )
    .await;

    // the sender was dropped with the collector, so the printer drains and stops
    match printer.await {
        Ok(Err(e)) => warn!("failed to print progress: {e}"),
        Err(e) => warn!("progress printer stopped: {e}"),
        Ok(Ok(_)) => {}
    }
    let report = result?;

    println!("{} saved", report.output_path.display());
    Ok(())
}

/// Load the catalog; a missing default catalog only disables title search.
fn load_catalog(explicit: Option<&str>) -> Result<Catalog> {
    let path = resolve_catalog_path(explicit);
    if explicit.is_none() && !path.exists() {
        warn!(
            "no movie catalog at {}, only movie IDs will work",
            path.display()
        );
        return Ok(Catalog::default());
    }
    Catalog::load(&path).with_context(|| format!("failed to load catalog {}", path.display()))
}
