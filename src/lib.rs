//! Storefront Crawler - paginated product listing scraper
//!
//! Renders a storefront's product listing in a headless browser, scrolls each
//! page until its lazily loaded products are present, extracts one record per
//! product card and exports the aggregated records as CSV ordered by sales.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod test_utils;

// Re-export commonly used items
pub use application::{CrawlError, CrawlOutcome, ExportService, PaginationController};
pub use domain::{ExportRow, ProductRecord};
pub use infrastructure::AppConfig;
