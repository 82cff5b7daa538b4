//! Parsing context for listing page extraction

/// Context information for parsing one listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// 1-based page number within the run
    pub page_index: u32,

    /// URL the page was rendered from
    pub page_url: String,
}

impl ParseContext {
    /// Create new parse context
    pub fn new(page_index: u32, page_url: impl Into<String>) -> Self {
        Self {
            page_index,
            page_url: page_url.into(),
        }
    }
}
