//! Progress reporting for a crawl run
//!
//! The controller and the export flow announce what they are doing through
//! `CrawlReporter`; the binary uses `TracingReporter` to print the console
//! summary through the logging stack.

use tracing::{info, warn};

use super::export_service::ExportSummary;
use crate::domain::constants::export::{
    COLUMN_PRICE, COLUMN_PRODUCT_NAME, COLUMN_SALES, COLUMN_UNIT, NAME_PREVIEW_CHARS,
};
use crate::domain::product::ProductRecord;

/// Observer of crawl and export progress
pub trait CrawlReporter: Send + Sync {
    fn page_started(&self, page: u32, url: &str);
    fn containers_found(&self, page: u32, count: usize);
    fn item_scraped(&self, page: u32, index: usize, record: &ProductRecord);
    fn last_page_reached(&self, page: u32);
    fn crawl_finished(&self, records: usize, pages: u32);
    fn nothing_to_export(&self);
    fn export_completed(&self, summary: &ExportSummary);
}

/// Reporter writing human readable progress lines to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl CrawlReporter for TracingReporter {
    fn page_started(&self, page: u32, url: &str) {
        info!("🔍 Scraping page {}: {}", page, url);
    }

    fn containers_found(&self, page: u32, count: usize) {
        info!("📦 Found {} product containers on page {}", count, page);
    }

    fn item_scraped(&self, page: u32, index: usize, record: &ProductRecord) {
        info!(
            "  [{}:{}] {} | unit: {} | price: {} | sales: {}",
            page,
            index,
            preview(&record.name, NAME_PREVIEW_CHARS),
            record.unit,
            record.price,
            record.sales
        );
    }

    fn last_page_reached(&self, page: u32) {
        info!("🏁 No next page button on page {}, reached the last page", page);
    }

    fn crawl_finished(&self, records: usize, pages: u32) {
        info!("✅ Scraping finished: {} products from {} pages", records, pages);
    }

    fn nothing_to_export(&self) {
        warn!("📭 No products were scraped, nothing to save");
    }

    fn export_completed(&self, summary: &ExportSummary) {
        info!("💾 Data saved to {}", summary.output_path.display());
        info!("📊 Total products: {}", summary.rows_written);
        if summary.rows_skipped > 0 {
            info!("⏭️ Rows without a price: {}", summary.rows_skipped);
        }

        if !summary.rows.is_empty() {
            info!("📋 All scraped data:");
            info!(
                "{:<52} {:<16} {:>12} {:>10}",
                COLUMN_PRODUCT_NAME, COLUMN_UNIT, COLUMN_PRICE, COLUMN_SALES
            );
            for row in &summary.rows {
                info!(
                    "{:<52} {:<16} {:>12.0} {:>10}",
                    preview(&row.product_name, NAME_PREVIEW_CHARS),
                    row.unit,
                    row.price,
                    row.sales
                );
            }
            info!("Total rows: {}", summary.rows.len());
        }
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
