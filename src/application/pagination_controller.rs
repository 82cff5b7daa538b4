//! Pagination controller
//!
//! Drives the crawl as an explicit state machine:
//! `Fetching -> Extracting -> CheckingNext -> (Fetching | Done)`, with any page
//! load failure ending in `Failed`. The controller owns the renderer for the
//! whole run and closes it on every exit path.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::reporter::CrawlReporter;
use crate::domain::pagination::{CrawlPhase, NextPageLink, PageState};
use crate::domain::product::ProductRecord;
use crate::infrastructure::page_loader::PageLoader;
use crate::infrastructure::parsing::{ParseContext, ProductListParser};
use crate::infrastructure::renderer::{PageRenderer, RendererError};

#[derive(Error, Debug)]
pub enum CrawlError {
    /// A page could not be loaded; records gathered before it travel with the error
    #[error("Page {page} ({url}) failed: {source}")]
    PageFailed {
        page: u32,
        url: String,
        partial: Vec<ProductRecord>,
        source: RendererError,
    },
}

impl CrawlError {
    /// Records collected before the failure
    pub fn partial_records(&self) -> &[ProductRecord] {
        match self {
            Self::PageFailed { partial, .. } => partial,
        }
    }

    pub fn into_partial_records(self) -> Vec<ProductRecord> {
        match self {
            Self::PageFailed { partial, .. } => partial,
        }
    }
}

/// Result of a crawl that reached `Done`
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome {
    /// Records from every page, in page order then card order
    pub records: Vec<ProductRecord>,
    pub pages_fetched: u32,
    pub final_phase: CrawlPhase,
}

/// Sequential multi-page crawler over one exclusively owned renderer
pub struct PaginationController<R: PageRenderer> {
    renderer: R,
    loader: PageLoader,
    parser: ProductListParser,
    reporter: Arc<dyn CrawlReporter>,
    page_delay: Duration,
}

impl<R: PageRenderer> PaginationController<R> {
    pub fn new(
        renderer: R,
        loader: PageLoader,
        parser: ProductListParser,
        reporter: Arc<dyn CrawlReporter>,
    ) -> Self {
        Self {
            renderer,
            loader,
            parser,
            reporter,
            page_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive pages
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Crawl from `start_url` until the last page, the page cap or a failure.
    ///
    /// A cap of `Some(0)` finishes immediately without navigating.
    /// The renderer is closed before this returns, whatever the outcome.
    pub async fn run(mut self, start_url: &str, max_pages: Option<u32>) -> Result<CrawlOutcome, CrawlError> {
        let result = self.crawl(start_url, max_pages).await;

        if let Err(e) = self.renderer.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        result
    }

    async fn crawl(&mut self, start_url: &str, max_pages: Option<u32>) -> Result<CrawlOutcome, CrawlError> {
        let mut state = PageState::new(start_url, 1);
        let mut phase = if max_pages == Some(0) {
            info!("⏹️ Page limit is 0, nothing to fetch");
            CrawlPhase::Done
        } else {
            CrawlPhase::Fetching
        };
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut pages_fetched = 0;
        let mut html = String::new();
        let mut failure: Option<RendererError> = None;

        while !phase.is_terminal() {
            phase = match phase {
                CrawlPhase::Fetching => {
                    self.reporter.page_started(state.page_index, &state.url);
                    match self.loader.load_page(&mut self.renderer, &state.url).await {
                        Ok(source) => {
                            pages_fetched += 1;
                            html = source;
                            transition(phase, CrawlPhase::Extracting, &state)
                        }
                        Err(e) => {
                            failure = Some(e);
                            transition(phase, CrawlPhase::Failed, &state)
                        }
                    }
                }
                CrawlPhase::Extracting => {
                    records.extend(self.extract(&html, &state));
                    transition(phase, CrawlPhase::CheckingNext, &state)
                }
                CrawlPhase::CheckingNext => match self.loader.next_page(&mut self.renderer, &state.url).await {
                    Ok(link) => {
                        state.has_next = link.exists();
                        match self.follow(link, &state, max_pages) {
                            Some(next_url) => {
                                if !self.page_delay.is_zero() {
                                    sleep(self.page_delay).await;
                                }
                                let next = PageState::new(next_url, state.page_index + 1);
                                let phase = transition(phase, CrawlPhase::Fetching, &next);
                                state = next;
                                phase
                            }
                            None => transition(phase, CrawlPhase::Done, &state),
                        }
                    }
                    Err(e) => {
                        failure = Some(e);
                        transition(phase, CrawlPhase::Failed, &state)
                    }
                },
                CrawlPhase::Done | CrawlPhase::Failed => phase,
            };
        }

        if let Some(source) = failure {
            return Err(CrawlError::PageFailed {
                page: state.page_index,
                url: state.url,
                partial: records,
                source,
            });
        }

        self.reporter.crawl_finished(records.len(), pages_fetched);
        Ok(CrawlOutcome {
            records,
            pages_fetched,
            final_phase: phase,
        })
    }

    /// Run the item extractor over every container on the page.
    ///
    /// Parsing happens synchronously so the parsed document never lives across an await.
    fn extract(&self, html: &str, state: &PageState) -> Vec<ProductRecord> {
        let context = ParseContext::new(state.page_index, state.url.clone());
        let extraction = self.parser.parse_page(html, &context);

        self.reporter
            .containers_found(state.page_index, extraction.containers_found);
        for (index, record) in &extraction.items {
            self.reporter.item_scraped(state.page_index, *index, record);
        }

        extraction.into_records()
    }

    /// Next URL to fetch, or `None` when the crawl should stop
    fn follow(&self, link: NextPageLink, state: &PageState, max_pages: Option<u32>) -> Option<String> {
        match link {
            NextPageLink::Absent => {
                self.reporter.last_page_reached(state.page_index);
                None
            }
            NextPageLink::Present { href: None } => {
                warn!(
                    "Next page control on page {} has no link, stopping",
                    state.page_index
                );
                None
            }
            NextPageLink::Present { href: Some(url) } => {
                if state.within_cap(max_pages) {
                    Some(url)
                } else {
                    info!("⏹️ Reached the page limit ({:?}), stopping", max_pages);
                    None
                }
            }
        }
    }
}

fn transition(from: CrawlPhase, to: CrawlPhase, state: &PageState) -> CrawlPhase {
    debug!("Page {}: {} -> {}", state.page_index, from, to);
    to
}
