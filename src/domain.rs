//! Domain module - Core entities and value objects
//!
//! Contains the scraped product record, the export row produced from it,
//! the per-page crawl state and the storefront constants shared by every layer.

pub mod constants;
pub mod pagination;
pub mod product;

// Re-export commonly used items for convenience
pub use pagination::{CrawlPhase, NextPageLink, PageState};
pub use product::{ExportRow, ProductRecord};
