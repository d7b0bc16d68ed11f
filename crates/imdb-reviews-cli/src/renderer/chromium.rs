//! Chromium-based renderer using chromiumoxide.

use super::{NavigationResult, RenderContext, Renderer};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::debug;

/// Environment variable naming the browser binary to drive.
pub const CHROMIUM_PATH_ENV: &str = "IMDB_REVIEWS_CHROMIUM_PATH";

/// Executable names tried on `PATH`, in order.
const BROWSER_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

const MACOS_CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Locate a Chrome or Chromium binary: the explicit override, then `PATH`,
/// then the stock macOS install.
pub fn find_chromium() -> Option<PathBuf> {
    explicit_binary(std::env::var_os(CHROMIUM_PATH_ENV))
        .or_else(|| BROWSER_NAMES.iter().find_map(|name| which::which(name).ok()))
        .or_else(|| {
            let app = PathBuf::from(MACOS_CHROME);
            (cfg!(target_os = "macos") && app.exists()).then_some(app)
        })
}

/// The override path, if it names an existing file.
fn explicit_binary(value: Option<OsString>) -> Option<PathBuf> {
    let path = PathBuf::from(value?);
    if path.is_file() {
        Some(path)
    } else {
        debug!("{CHROMIUM_PATH_ENV}={} is not a file, searching PATH", path.display());
        None
    }
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    browser: Browser,
    handler_task: JoinHandle<()>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Launch a Chromium instance, headless unless `headless` is false.
    pub async fn launch(headless: bool) -> Result<Self> {
        let chrome_path = find_chromium()
            .with_context(|| format!("Chromium not found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}."))?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        builder = if headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {e}");
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        // Browser process is killed when ChromiumRenderer is dropped
        self.handler_task.abort();
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        let load_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_)) => {
                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationResult {
                    final_url,
                    load_time_ms,
                })
            }
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {timeout_ms}ms"),
        }
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("JS execution failed")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert JS result: {e:?}"))
    }

    async fn read_text(&self, selector: &str) -> Result<Option<String>> {
        let element = match self.page.find_element(selector).await {
            Ok(element) => element,
            Err(e) => {
                debug!("no element for {selector}: {e}");
                return Ok(None);
            }
        };
        element
            .inner_text()
            .await
            .with_context(|| format!("failed to read text of {selector}"))
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(elements.len()),
            Err(e) => {
                debug!("no elements for {selector}: {e}");
                Ok(0)
            }
        }
    }

    async fn click(&self, selector: &str) -> bool {
        match self.page.find_element(selector).await {
            Ok(element) => element.click().await.is_ok(),
            Err(_) => false,
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_binary_must_exist() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = explicit_binary(Some(file.path().as_os_str().to_owned()));
        assert_eq!(found.as_deref(), Some(file.path()));

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(explicit_binary(Some(dir.path().as_os_str().to_owned())), None);
        assert_eq!(
            explicit_binary(Some(dir.path().join("no-such-chrome").into_os_string())),
            None
        );
        assert_eq!(explicit_binary(None), None);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_click_and_count() {
        let renderer = ChromiumRenderer::launch(true)
            .await
            .expect("failed to launch renderer");
        let mut ctx = renderer
            .new_context()
            .await
            .expect("failed to create context");

        ctx.navigate(
            "data:text/html,<ul><li class='item'>a</li></ul>\
             <button id='more' onclick=\"this.remove()\">more</button>",
            10000,
        )
        .await
        .expect("navigation failed");

        assert_eq!(ctx.count(".item").await.unwrap(), 1);
        assert_eq!(
            ctx.read_text(".item").await.unwrap().as_deref(),
            Some("a")
        );
        assert!(ctx.click("#more").await);
        assert!(!ctx.click("#more").await);

        let html = ctx.get_html().await.expect("get_html failed");
        assert!(html.contains("class=\"item\""));

        ctx.close().await.expect("close failed");
        assert_eq!(renderer.active_contexts(), 0);

        renderer.shutdown().await.expect("shutdown failed");
    }
}
