//! Review collector — paginate a listing by clicking "load more" until the
//! trigger goes away, then extract every rendered review.
//!
//! The run is a small state machine:
//!
//! ```text
//! Init ──navigate──▶ Loading ──click ok, wait delay──▶ Loading
//!                       │
//!                       └──click failed (or page cap hit)──▶ Done ──▶ extract
//! ```
//!
//! The advertised review total is only a progress hint. The host removes
//! moderated reviews without updating it, so the loop never stops on it.

use std::time::Duration;

use anyhow::{Context, Result};
use imdb_reviews::{extract_reviews, parse_review_total, ResolvedTarget, ReviewRecord, ReviewSelectors};
use tracing::{debug, info, warn};

use crate::progress::{self, CollectEventKind, ProgressSender};
use crate::renderer::RenderContext;

/// Listing pages live under `{base}/{id}/reviews`.
pub const DEFAULT_BASE_URL: &str = "http://www.imdb.com/title";

/// Pause between two "load more" clicks.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(2000);

/// Navigation timeout in milliseconds.
pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

/// Collector options.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub base_url: String,
    pub fetch_delay: Duration,
    pub nav_timeout_ms: u64,
    /// Stop after this many successful clicks even if more pages remain.
    pub max_pages: Option<u32>,
    pub selectors: ReviewSelectors,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_delay: DEFAULT_FETCH_DELAY,
            nav_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            max_pages: None,
            selectors: ReviewSelectors::default(),
        }
    }
}

/// URL of the review listing for movie `id`.
pub fn review_url(base_url: &str, id: &str) -> String {
    format!("{}/{id}/reviews", base_url.trim_end_matches('/'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectState {
    Init,
    Loading { attempt: u32 },
    Done { attempts: u32, capped: bool },
}

/// Drives one render context through pagination and extraction.
pub struct Collector {
    config: CollectorConfig,
    progress: Option<ProgressSender>,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Broadcast progress events to `tx`.
    pub fn with_progress(mut self, tx: Option<ProgressSender>) -> Self {
        self.progress = tx;
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect all reviews of `target`, in page order.
    pub async fn collect(
        &self,
        ctx: &mut dyn RenderContext,
        target: &ResolvedTarget,
    ) -> Result<Vec<ReviewRecord>> {
        let id = target.id.as_str();
        let sel = &self.config.selectors;
        let mut seq = 0u64;
        let mut total: Option<u64> = None;
        let mut state = CollectState::Init;

        loop {
            state = match state {
                CollectState::Init => {
                    let url = review_url(&self.config.base_url, id);
                    let nav = ctx
                        .navigate(&url, self.config.nav_timeout_ms)
                        .await
                        .with_context(|| format!("failed to open {url}"))?;
                    info!(
                        url = %nav.final_url,
                        load_time_ms = nav.load_time_ms,
                        "review listing opened"
                    );

                    total = self.read_total(ctx).await;
                    progress::emit(
                        &self.progress,
                        id,
                        &mut seq,
                        CollectEventKind::Navigated { url, total },
                    );
                    CollectState::Loading { attempt: 0 }
                }
                CollectState::Loading { attempt } => {
                    let attempt = attempt + 1;
                    let clicked = ctx.click(&sel.load_more).await;
                    let loaded = ctx
                        .count(&sel.item)
                        .await
                        .context("failed to count rendered reviews")?;
                    debug!(attempt, clicked, "{loaded} / {}", progress::display_total(total));
                    progress::emit(
                        &self.progress,
                        id,
                        &mut seq,
                        CollectEventKind::PageLoaded {
                            attempt,
                            clicked,
                            loaded,
                            total,
                        },
                    );

                    if !clicked {
                        debug!(attempt, "load-more trigger gone");
                        CollectState::Done {
                            attempts: attempt,
                            capped: false,
                        }
                    } else if self.config.max_pages.is_some_and(|max| attempt >= max) {
                        warn!(
                            max_pages = attempt,
                            "page limit reached, more reviews may be available"
                        );
                        CollectState::Done {
                            attempts: attempt,
                            capped: true,
                        }
                    } else {
                        tokio::time::sleep(self.config.fetch_delay).await;
                        CollectState::Loading { attempt }
                    }
                }
                CollectState::Done { attempts, capped } => {
                    progress::emit(
                        &self.progress,
                        id,
                        &mut seq,
                        CollectEventKind::Exhausted { attempts, capped },
                    );
                    break;
                }
            };
        }

        let html = ctx.get_html().await?;
        let records = extract_reviews(&html, sel)
            .with_context(|| format!("failed to extract reviews for {id}"))?;
        debug!(count = records.len(), "reviews extracted");
        progress::emit(
            &self.progress,
            id,
            &mut seq,
            CollectEventKind::Extracted {
                count: records.len(),
            },
        );

        Ok(records)
    }

    async fn read_total(&self, ctx: &dyn RenderContext) -> Option<u64> {
        let selector = &self.config.selectors.total;
        match ctx.read_text(selector).await {
            Ok(Some(text)) => {
                let total = parse_review_total(&text);
                if total.is_none() {
                    warn!("review total {text:?} is not a number");
                }
                total
            }
            Ok(None) => {
                warn!("review total not found ({selector})");
                None
            }
            Err(e) => {
                warn!("failed to read review total: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_url() {
        assert_eq!(
            review_url(DEFAULT_BASE_URL, "tt0111161"),
            "http://www.imdb.com/title/tt0111161/reviews"
        );
        assert_eq!(
            review_url("http://localhost:8080/title/", "tt1"),
            "http://localhost:8080/title/tt1/reviews"
        );
    }

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.fetch_delay, Duration::from_secs(2));
        assert!(config.max_pages.is_none());
        assert_eq!(config.selectors.load_more, "#load-more-trigger");
    }
}
