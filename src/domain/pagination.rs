//! Pagination domain logic.
//!
//! Responsibility:
//! - per-page crawl state (`PageState`)
//! - crawl state machine phases (`CrawlPhase`)
//! - next-page control lookup result (`NextPageLink`)
//! - page cap check

use std::fmt;

/// Ephemeral state of the page currently being crawled.
///
/// Created for each page iteration and dropped once the next URL is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// URL the page was loaded from
    pub url: String,
    /// 1-based page number within this run
    pub page_index: u32,
    /// Whether a "next page" control was present on the page
    pub has_next: bool,
}

impl PageState {
    pub fn new(url: impl Into<String>, page_index: u32) -> Self {
        Self {
            url: url.into(),
            page_index,
            has_next: false,
        }
    }

    /// Whether another page may be fetched under the given cap (`None` = no limit)
    pub fn within_cap(&self, max_pages: Option<u32>) -> bool {
        max_pages.is_none_or(|cap| self.page_index < cap)
    }
}

/// Phases of the pagination state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Fetching,
    Extracting,
    CheckingNext,
    Done,
    Failed,
}

impl CrawlPhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::CheckingNext => "checking_next",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of looking up the "next page" control on a rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPageLink {
    /// No control: the current page is the last one
    Absent,
    /// Control present; `href` is the resolved target when it had one
    Present { href: Option<String> },
}

impl NextPageLink {
    pub const fn exists(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Present { href } => href.as_deref(),
            Self::Absent => None,
        }
    }
}
