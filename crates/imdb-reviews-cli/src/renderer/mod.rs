//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide), so the
//! collector can run against an in-memory page in tests.

pub mod chromium;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Rendered text of the first element matching `selector`, if any.
    async fn read_text(&self, selector: &str) -> Result<Option<String>>;
    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;
    /// Click the first element matching `selector`.
    ///
    /// Returns `false` when the element is missing or cannot be clicked.
    async fn click(&self, selector: &str) -> bool;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;

    /// Get the full page HTML.
    async fn get_html(&self) -> Result<String> {
        let value = self
            .execute_js("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?;
        match value {
            serde_json::Value::String(html) => Ok(html),
            other => anyhow::bail!("page HTML is not a string: {other}"),
        }
    }
}
