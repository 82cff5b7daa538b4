//! Test utilities for storefront crawling
//!
//! Provides a scripted in-memory renderer and a recording reporter so the
//! page loader, the pagination controller and the export flow can be tested
//! without launching a browser.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::application::export_service::ExportSummary;
use crate::application::reporter::CrawlReporter;
use crate::domain::product::ProductRecord;
use crate::infrastructure::renderer::{PageRenderer, RenderedElement, RendererError, RendererResult};

/// Scripted behaviour of one URL
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    html: String,
    heights: Vec<u64>,
    next: Option<Option<String>>,
    fail_wait: bool,
}

impl PageScript {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    /// Successive `document.body.scrollHeight` readings; the last one repeats
    #[must_use]
    pub fn with_heights(mut self, heights: &[u64]) -> Self {
        self.heights = heights.to_vec();
        self
    }

    /// Next-page control with the given (possibly relative) link
    #[must_use]
    pub fn with_next(mut self, href: impl Into<String>) -> Self {
        self.next = Some(Some(href.into()));
        self
    }

    /// Next-page control without a usable link
    #[must_use]
    pub fn with_next_without_href(mut self) -> Self {
        self.next = Some(None);
        self
    }

    /// The ready marker never appears
    #[must_use]
    pub fn failing_wait(mut self) -> Self {
        self.fail_wait = true;
        self
    }
}

#[derive(Debug, Default)]
struct RendererLogState {
    navigations: Vec<String>,
    calls: Vec<String>,
    scrolls: usize,
    close_calls: usize,
    closed: bool,
}

/// Shared view of what a `ScriptedRenderer` was asked to do
#[derive(Debug, Clone, Default)]
pub struct RendererLog {
    state: Arc<Mutex<RendererLogState>>,
}

impl RendererLog {
    fn lock(&self) -> MutexGuard<'_, RendererLogState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    pub fn scroll_count(&self) -> usize {
        self.lock().scrolls
    }

    /// Every renderer call in order: `navigate <url>`, `wait <selector>`,
    /// each script verbatim, `find <selector>` and `page_source`
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.lock().calls.push(call.into());
    }

    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// In-memory `PageRenderer` that serves scripted pages by URL
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    pages: HashMap<String, PageScript>,
    current: Option<String>,
    height_cursor: usize,
    log: RendererLog,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, script: PageScript) -> Self {
        self.pages.insert(url.into(), script);
        self
    }

    /// Handle that stays readable after the renderer has been moved away
    pub fn log(&self) -> RendererLog {
        self.log.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.log.navigations()
    }

    pub fn scroll_count(&self) -> usize {
        self.log.scroll_count()
    }

    fn ensure_open(&self) -> RendererResult<()> {
        if self.log.is_closed() {
            Err(RendererError::Closed)
        } else {
            Ok(())
        }
    }

    fn current_page(&self) -> RendererResult<&PageScript> {
        self.ensure_open()?;
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| RendererError::Script("no page loaded".to_string()))
    }

    fn next_height(&mut self) -> RendererResult<u64> {
        let heights = &self.current_page()?.heights;
        let height = heights
            .get(self.height_cursor)
            .or_else(|| heights.last())
            .copied()
            .unwrap_or(1000);
        self.height_cursor += 1;
        Ok(height)
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn navigate(&mut self, url: &str) -> RendererResult<()> {
        self.ensure_open()?;
        self.log.lock().navigations.push(url.to_string());
        self.log.record(format!("navigate {url}"));

        if !self.pages.contains_key(url) {
            self.current = None;
            return Err(RendererError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }

        self.current = Some(url.to_string());
        self.height_cursor = 0;
        Ok(())
    }

    async fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> RendererResult<()> {
        self.log.record(format!("wait {selector}"));
        if self.current_page()?.fail_wait {
            return Err(RendererError::Timeout {
                selector: selector.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> RendererResult<serde_json::Value> {
        self.current_page()?;
        self.log.record(script);

        if script.trim() == "document.body.scrollHeight" {
            return Ok(serde_json::Value::from(self.next_height()?));
        }
        if script.contains("scrollTo(0, document.body.scrollHeight)") {
            self.log.lock().scrolls += 1;
        }
        Ok(serde_json::Value::Null)
    }

    async fn find_element(&mut self, selector: &str) -> RendererResult<Option<RenderedElement>> {
        self.log.record(format!("find {selector}"));
        let page = self.current_page()?;
        Ok(page.next.as_ref().map(|href| {
            let mut element = RenderedElement::default();
            if let Some(href) = href {
                element.attributes.insert("href".to_string(), href.clone());
            }
            element
        }))
    }

    async fn page_source(&mut self) -> RendererResult<String> {
        self.log.record("page_source");
        Ok(self.current_page()?.html.clone())
    }

    async fn close(&mut self) -> RendererResult<()> {
        let mut state = self.log.lock();
        state.close_calls += 1;
        state.closed = true;
        Ok(())
    }
}

/// Events observed by a `RecordingReporter`
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    PageStarted { page: u32, url: String },
    ContainersFound { page: u32, count: usize },
    ItemScraped { page: u32, index: usize, name: String },
    LastPageReached { page: u32 },
    CrawlFinished { records: usize, pages: u32 },
    NothingToExport,
    ExportCompleted(ExportSummary),
}

/// Reporter that keeps every event for later assertions
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

impl CrawlReporter for RecordingReporter {
    fn page_started(&self, page: u32, url: &str) {
        self.push(ReportEvent::PageStarted {
            page,
            url: url.to_string(),
        });
    }

    fn containers_found(&self, page: u32, count: usize) {
        self.push(ReportEvent::ContainersFound { page, count });
    }

    fn item_scraped(&self, page: u32, index: usize, record: &ProductRecord) {
        self.push(ReportEvent::ItemScraped {
            page,
            index,
            name: record.name.clone(),
        });
    }

    fn last_page_reached(&self, page: u32) {
        self.push(ReportEvent::LastPageReached { page });
    }

    fn crawl_finished(&self, records: usize, pages: u32) {
        self.push(ReportEvent::CrawlFinished { records, pages });
    }

    fn nothing_to_export(&self) {
        self.push(ReportEvent::NothingToExport);
    }

    fn export_completed(&self, summary: &ExportSummary) {
        self.push(ReportEvent::ExportCompleted(summary.clone()));
    }
}

/// Listing page with one product card per `(name, price, sales label)`
pub fn listing_page(cards: &[(&str, &str, &str)]) -> String {
    let cards: String = cards
        .iter()
        .map(|(name, price, sales)| {
            format!(
                r#"<div class="css-54k5sq">
  <div data-testid="linkProductName">{name}</div>
  <div data-testid="linkProductPrice">{price}</div>
  <span class="prd_label-integrity">{sales}</span>
</div>"#
            )
        })
        .collect();
    format!("<html><body><div class=\"product-grid\">{cards}</div></body></html>")
}
