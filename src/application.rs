//! Application layer module
//!
//! This module contains the crawl and export flows that orchestrate the
//! domain types and the infrastructure services.

pub mod export_service;
pub mod pagination_controller;
pub mod reporter;

pub use export_service::{ExportError, ExportService, ExportSummary};
pub use pagination_controller::{CrawlError, CrawlOutcome, PaginationController};
pub use reporter::{CrawlReporter, TracingReporter};
