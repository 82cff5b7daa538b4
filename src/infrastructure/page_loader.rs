//! Page loading on top of a `PageRenderer`
//!
//! Loads one listing page until its lazily rendered product list is complete,
//! then hands back the final HTML. Also locates the next-page control.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::config::{AppConfig, CrawlConfig};
use super::renderer::{PageRenderer, RendererError, RendererResult};
use crate::domain::pagination::NextPageLink;

const SCROLL_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
const SCROLL_TO_TOP_SCRIPT: &str = "window.scrollTo(0, 0);";

/// Selectors and timings used while loading a page
#[derive(Debug, Clone)]
pub struct PageLoaderConfig {
    /// Element whose presence means the product list has started rendering
    pub ready_selector: String,
    pub next_page_selector: String,
    pub wait_timeout: Duration,
    pub scroll_pause: Duration,
    pub max_scroll_rounds: u32,
    pub top_pause: Duration,
    pub settle_delay: Duration,
}

impl PageLoaderConfig {
    pub fn new(
        ready_selector: impl Into<String>,
        next_page_selector: impl Into<String>,
        crawl: &CrawlConfig,
    ) -> Self {
        Self {
            ready_selector: ready_selector.into(),
            next_page_selector: next_page_selector.into(),
            wait_timeout: crawl.wait_timeout(),
            scroll_pause: Duration::from_millis(crawl.scroll_pause_ms),
            max_scroll_rounds: crawl.max_scroll_rounds,
            top_pause: Duration::from_millis(crawl.top_pause_ms),
            settle_delay: Duration::from_millis(crawl.settle_delay_ms),
        }
    }

    /// Same selectors with every pause set to zero
    #[must_use]
    pub fn without_pauses(mut self) -> Self {
        self.scroll_pause = Duration::ZERO;
        self.top_pause = Duration::ZERO;
        self.settle_delay = Duration::ZERO;
        self
    }
}

impl From<&AppConfig> for PageLoaderConfig {
    fn from(config: &AppConfig) -> Self {
        Self::new(
            config.selectors.product_container.clone(),
            config.selectors.next_page.clone(),
            &config.crawl,
        )
    }
}

/// Outcome of the scroll phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    pub rounds: u32,
    pub final_height: u64,
    /// False when the round cap was hit before the height settled
    pub stabilized: bool,
}

/// Loads listing pages through a renderer
#[derive(Debug, Clone)]
pub struct PageLoader {
    config: PageLoaderConfig,
}

impl PageLoader {
    pub const fn new(config: PageLoaderConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &PageLoaderConfig {
        &self.config
    }

    /// Navigate to `url`, wait for the product list, scroll until the page stops
    /// growing and return the rendered HTML.
    ///
    /// A missing ready marker is fatal; failing to stabilize is not.
    pub async fn load_page<R>(&self, renderer: &mut R, url: &str) -> RendererResult<String>
    where
        R: PageRenderer + ?Sized,
    {
        info!("📄 Loading {}", url);
        renderer.navigate(url).await?;
        renderer
            .wait_for_element(&self.config.ready_selector, self.config.wait_timeout)
            .await?;

        let report = self.scroll_to_end(renderer).await?;
        if report.stabilized {
            debug!(
                "Page height settled at {} after {} scroll rounds",
                report.final_height, report.rounds
            );
        } else {
            warn!(
                "Page height still growing after {} scroll rounds, continuing with what is loaded",
                report.rounds
            );
        }

        renderer.execute_script(SCROLL_TO_TOP_SCRIPT).await?;
        pause(self.config.top_pause).await;
        pause(self.config.settle_delay).await;

        renderer.page_source().await
    }

    /// Scroll to the bottom until two consecutive height readings match
    pub async fn scroll_to_end<R>(&self, renderer: &mut R) -> RendererResult<ScrollReport>
    where
        R: PageRenderer + ?Sized,
    {
        let mut last_height = page_height(renderer).await?;
        let mut rounds = 0;

        while rounds < self.config.max_scroll_rounds {
            renderer.execute_script(SCROLL_TO_BOTTOM_SCRIPT).await?;
            pause(self.config.scroll_pause).await;
            rounds += 1;

            let new_height = page_height(renderer).await?;
            if new_height == last_height {
                return Ok(ScrollReport {
                    rounds,
                    final_height: new_height,
                    stabilized: true,
                });
            }
            last_height = new_height;
        }

        Ok(ScrollReport {
            rounds,
            final_height: last_height,
            stabilized: false,
        })
    }

    /// Look for the next-page control on the current page.
    ///
    /// A relative link is resolved against `current_url`.
    pub async fn next_page<R>(&self, renderer: &mut R, current_url: &str) -> RendererResult<NextPageLink>
    where
        R: PageRenderer + ?Sized,
    {
        let Some(element) = renderer.find_element(&self.config.next_page_selector).await? else {
            return Ok(NextPageLink::Absent);
        };

        let href = match element.href() {
            Some(href) => Some(resolve_href(current_url, href)?),
            None => None,
        };

        Ok(NextPageLink::Present { href })
    }
}

async fn page_height<R>(renderer: &mut R) -> RendererResult<u64>
where
    R: PageRenderer + ?Sized,
{
    let value = renderer.execute_script(SCROLL_HEIGHT_SCRIPT).await?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|h| *h >= 0.0).map(|h| h as u64))
        .ok_or_else(|| RendererError::Script(format!("page height is not a number: {value}")))
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}

fn resolve_href(base: &str, href: &str) -> RendererResult<String> {
    let href = href.trim();
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute.to_string());
    }

    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .map_err(|e| RendererError::Script(format!("cannot resolve next page link '{href}': {e}")))
}
