//! Chromium-based renderer using chromiumoxide.

use super::{PageRenderer, RenderedElement, RendererError, RendererResult, find_element_script};
use crate::infrastructure::config::BrowserSettings;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// One headless (or headed) Chromium session with a single tab.
pub struct ChromiumRenderer {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl ChromiumRenderer {
    /// Launch a Chromium instance and open a blank tab.
    pub async fn launch(settings: &BrowserSettings, poll_interval: Duration) -> RendererResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(settings.window_width, settings.window_height)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }
        for arg in &settings.extra_args {
            builder = builder.arg(arg.as_str());
        }

        let config = builder
            .build()
            .map_err(|e| RendererError::Launch(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RendererError::Launch(e.to_string()))?;

        // Drive the DevTools event stream for the lifetime of the session
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RendererError::Launch(format!("failed to create new page: {e}")))?;

        info!("🌐 Browser session started (headless: {})", settings.headless);

        Ok(Self {
            browser,
            page: Some(page),
            handler,
            poll_interval,
        })
    }

    fn page(&self) -> RendererResult<&Page> {
        self.page.as_ref().ok_or(RendererError::Closed)
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn navigate(&mut self, url: &str) -> RendererResult<()> {
        debug!("Navigating to {}", url);
        self.page()?
            .goto(url)
            .await
            .map_err(|e| RendererError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> RendererResult<()> {
        let script = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector).map_err(|e| RendererError::Script(e.to_string()))?
        );
        let deadline = Instant::now() + timeout;

        loop {
            if self.execute_script(&script).await?.as_bool().unwrap_or(false) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(RendererError::Timeout {
                    selector: selector.to_string(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn execute_script(&mut self, script: &str) -> RendererResult<serde_json::Value> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| RendererError::Script(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn find_element(&mut self, selector: &str) -> RendererResult<Option<RenderedElement>> {
        let value = self.execute_script(&find_element_script(selector)?).await?;
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RendererError::Script(format!("unexpected element payload: {e}")))
    }

    async fn page_source(&mut self) -> RendererResult<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| RendererError::Script(format!("failed to get HTML: {e}")))
    }

    async fn close(&mut self) -> RendererResult<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };

        if let Err(e) = page.close().await {
            warn!("Failed to close tab cleanly: {}", e);
        }
        let result = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();

        info!("🌐 Browser session closed");
        result
            .map(|_| ())
            .map_err(|e| RendererError::Launch(format!("failed to close browser: {e}")))
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        if self.page.is_some() {
            warn!("Browser session dropped without close()");
        }
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_render_and_query() {
        let mut renderer = ChromiumRenderer::launch(&BrowserSettings::default(), Duration::from_millis(100))
            .await
            .expect("failed to launch browser");

        renderer
            .navigate("data:text/html,<div class='card'><a id='next' href='/page/2'>Next</a></div>")
            .await
            .expect("navigation failed");
        renderer
            .wait_for_element(".card", Duration::from_secs(5))
            .await
            .expect("marker not found");

        let next = renderer.find_element("#next").await.expect("query failed");
        assert!(next.is_some());
        assert!(renderer.find_element("#missing").await.expect("query failed").is_none());

        let html = renderer.page_source().await.expect("page_source failed");
        assert!(html.contains("class=\"card\""));

        renderer.close().await.expect("close failed");
        assert!(matches!(renderer.page_source().await, Err(RendererError::Closed)));
    }
}
