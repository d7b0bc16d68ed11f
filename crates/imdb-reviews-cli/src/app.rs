//! One complete run: resolve the query, collect reviews, save them.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use imdb_reviews::{output_path, resolve, write_reviews, Catalog, Resolution};
use tracing::{info, warn};

use crate::collector::Collector;
use crate::config::Settings;
use crate::progress::ProgressSender;
use crate::renderer::Renderer;

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub resolution: Resolution,
    pub output_path: PathBuf,
    pub review_count: usize,
}

/// Fetch all reviews for `query` and write them to the output directory.
///
/// `launch` is only called once the query resolved, so bad input never
/// starts a browser. The render context is closed and the renderer shut
/// down whether or not collection succeeds; nothing is written on failure.
pub async fn run<F, Fut, R>(
    query: &str,
    catalog: &Catalog,
    launch: F,
    settings: &Settings,
    progress: Option<ProgressSender>,
) -> Result<RunReport>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R>>,
    R: Renderer,
{
    let resolution = resolve(query, catalog)?;
    let target = &resolution.target;
    info!(
        "Fetching user reviews for:\n{}",
        serde_json::to_string_pretty(target)?
    );

    let renderer = launch().await?;
    let collector = Collector::new(settings.collector.clone()).with_progress(progress);

    let collected = match renderer.new_context().await {
        Ok(mut ctx) => {
            let collected = collector.collect(ctx.as_mut(), target).await;
            if let Err(e) = ctx.close().await {
                warn!("failed to close render context: {e:#}");
            }
            collected
        }
        Err(e) => Err(e.context("failed to open a browser tab")),
    };
    if let Err(e) = renderer.shutdown().await {
        warn!("failed to shut down renderer: {e:#}");
    }
    let reviews = collected?;

    let path = output_path(&settings.output_dir, &target.id);
    write_reviews(&path, &reviews).context("failed to save reviews")?;
    info!("{} saved", path.display());

    Ok(RunReport {
        review_count: reviews.len(),
        output_path: path,
        resolution,
    })
}
