//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `PageRenderer` trait that abstracts over the browser engine
//! (currently Chromium via chromiumoxide). A renderer is one exclusively owned
//! browser session: the crawl drives it sequentially and closes it exactly once.

pub mod chromium;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub use chromium::ChromiumRenderer;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {timeout_secs}s waiting for '{selector}'")]
    Timeout { selector: String, timeout_secs: u64 },

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("Browser session is closed")]
    Closed,
}

pub type RendererResult<T> = Result<T, RendererError>;

/// Snapshot of an element located in the live page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedElement {
    /// Attribute values; `href` holds the resolved absolute link when the element has one
    pub attributes: HashMap<String, String>,
}

impl RenderedElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn href(&self) -> Option<&str> {
        self.attribute("href").filter(|href| !href.trim().is_empty())
    }
}

/// A browser session able to render JavaScript-heavy pages
#[async_trait]
pub trait PageRenderer: Send {
    /// Navigate the session to a URL.
    async fn navigate(&mut self, url: &str) -> RendererResult<()>;

    /// Block until an element matching `selector` exists, or fail with `RendererError::Timeout`.
    async fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> RendererResult<()>;

    /// Execute JavaScript in the page context and return its result (`Null` for undefined).
    async fn execute_script(&mut self, script: &str) -> RendererResult<serde_json::Value>;

    /// Locate the first element matching `selector`.
    async fn find_element(&mut self, selector: &str) -> RendererResult<Option<RenderedElement>>;

    /// Get the full page HTML.
    async fn page_source(&mut self) -> RendererResult<String>;

    /// Release the browser session. Calling it again is a no-op.
    async fn close(&mut self) -> RendererResult<()>;
}

/// Script returning the attributes of the first element matching a selector, or null
pub(crate) fn find_element_script(selector: &str) -> RendererResult<String> {
    let selector = serde_json::to_string(selector).map_err(|e| RendererError::Script(e.to_string()))?;
    Ok(format!(
        r"(() => {{
    const el = document.querySelector({selector});
    if (!el) return null;
    const attributes = {{}};
    for (const attr of el.attributes) attributes[attr.name] = attr.value;
    if (typeof el.href === 'string' && el.href) attributes.href = el.href;
    return {{ attributes }};
}})()"
    ))
}
