//! Export of scraped records
//!
//! Normalizes prices, orders rows by sales and writes the delimited file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::reporter::CrawlReporter;
use crate::domain::product::{ExportRow, ProductRecord};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv_exporter::CsvExporter;
use crate::infrastructure::parsing::{ParsingError, TextNormalizer};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot export '{name}': {source}")]
    InvalidPrice { name: String, source: ParsingError },

    #[error("Failed to write CSV file: {0}")]
    Csv(#[from] csv::Error),
}

/// What an export run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    pub rows_written: usize,
    /// Records left out because their price was never found
    pub rows_skipped: usize,
    /// Written rows, in file order
    pub rows: Vec<ExportRow>,
}

/// Export flow from aggregated records to a file on disk
pub struct ExportService {
    exporter: CsvExporter,
    normalizer: TextNormalizer,
    output_path: PathBuf,
    reporter: Arc<dyn CrawlReporter>,
}

impl ExportService {
    pub fn new(
        exporter: CsvExporter,
        normalizer: TextNormalizer,
        output_path: impl Into<PathBuf>,
        reporter: Arc<dyn CrawlReporter>,
    ) -> Self {
        Self {
            exporter,
            normalizer,
            output_path: output_path.into(),
            reporter,
        }
    }

    pub fn from_config(config: &AppConfig, reporter: Arc<dyn CrawlReporter>) -> Self {
        Self::new(
            CsvExporter::from_config(&config.export),
            TextNormalizer::new(config.normalization.clone()),
            config.export.output_path.clone(),
            reporter,
        )
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write `records` to the output file.
    ///
    /// Returns `Ok(None)` without touching the file system when there is
    /// nothing to write. Every price is validated before the file is created.
    pub fn export(&self, records: &[ProductRecord]) -> Result<Option<ExportSummary>, ExportError> {
        if records.is_empty() {
            self.reporter.nothing_to_export();
            return Ok(None);
        }

        let (mut rows, rows_skipped) = self.prepare_rows(records)?;
        if rows.is_empty() {
            warn!("All {} records lack a price", rows_skipped);
            self.reporter.nothing_to_export();
            return Ok(None);
        }

        sort_by_sales(&mut rows);
        self.exporter.write_file(&self.output_path, &rows)?;

        let summary = ExportSummary {
            output_path: self.output_path.clone(),
            rows_written: rows.len(),
            rows_skipped,
            rows,
        };
        self.reporter.export_completed(&summary);
        Ok(Some(summary))
    }

    /// Convert records to rows with numeric prices, in input order.
    ///
    /// Records whose price is the "not found" sentinel are dropped and counted;
    /// any other malformed price aborts.
    pub fn prepare_rows(&self, records: &[ProductRecord]) -> Result<(Vec<ExportRow>, usize), ExportError> {
        let mut rows = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            if record.has_missing_price() {
                warn!("Skipping '{}': price not found", record.name);
                skipped += 1;
                continue;
            }

            let price = self
                .normalizer
                .parse_price(&record.price)
                .map_err(|source| ExportError::InvalidPrice {
                    name: record.name.clone(),
                    source,
                })?;
            rows.push(ExportRow::from_record(record, price));
        }

        debug!("Prepared {} rows ({} skipped)", rows.len(), skipped);
        Ok((rows, skipped))
    }
}

/// Order rows by sales, highest first; equal sales keep their relative order
pub fn sort_by_sales(rows: &mut [ExportRow]) {
    rows.sort_by(|a, b| b.sales.cmp(&a.sales));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingReporter, ReportEvent};

    fn service(path: &Path, reporter: &RecordingReporter) -> ExportService {
        ExportService::new(
            CsvExporter::default(),
            TextNormalizer::default(),
            path,
            Arc::new(reporter.clone()),
        )
    }

    #[test]
    fn test_rows_sorted_by_sales_descending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let reporter = RecordingReporter::new();

        let records = vec![
            ProductRecord::new("A", "", "Rp1.000", 10),
            ProductRecord::new("B", "", "Rp2.000", 50),
            ProductRecord::new("C", "", "Rp3.000", 20),
        ];
        let summary = service(&path, &reporter).export(&records).unwrap().unwrap();

        let sales: Vec<u64> = summary.rows.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![50, 20, 10]);
        assert_eq!(summary.rows[0].price, 2000.0);

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "Product Name,Unit,Price,Sales");
        assert_eq!(lines[1], "B,,2000.0,50");
        assert_eq!(lines.len(), 4);
        assert!(reporter.events().contains(&ReportEvent::ExportCompleted(summary)));
    }

    #[test]
    fn test_equal_sales_keep_input_order() {
        let mut rows: Vec<ExportRow> = ["first", "second", "third", "fourth"]
            .iter()
            .zip([5, 9, 5, 5])
            .map(|(name, sales)| ExportRow::from_record(&ProductRecord::new(*name, "", "Rp1", sales), 1.0))
            .collect();

        sort_by_sales(&mut rows);

        let names: Vec<&str> = rows.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third", "fourth"]);
    }

    #[test]
    fn test_empty_records_write_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let reporter = RecordingReporter::new();

        let summary = service(&path, &reporter).export(&[]).unwrap();

        assert!(summary.is_none());
        assert!(!path.exists());
        assert_eq!(reporter.events(), vec![ReportEvent::NothingToExport]);
    }

    #[test]
    fn test_missing_price_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let reporter = RecordingReporter::new();

        let records = vec![
            ProductRecord::new("Teh Hijau", "", "N/A", 30),
            ProductRecord::new("Kopi Bubuk", "200GR", "Rp25.500", 12),
        ];
        let summary = service(&path, &reporter).export(&records).unwrap().unwrap();

        assert_eq!(summary.rows_written, 1);
        assert_eq!(summary.rows_skipped, 1);
        assert_eq!(summary.rows[0].product_name, "Kopi Bubuk");
        assert_eq!(summary.rows[0].price, 25500.0);
    }

    #[test]
    fn test_malformed_price_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let reporter = RecordingReporter::new();

        let records = vec![
            ProductRecord::new("Susu UHT", "250ML", "Rp5.500", 3),
            ProductRecord::new("Promo", "", "Gratis", 1),
        ];
        let err = service(&path, &reporter).export(&records).unwrap_err();

        assert!(matches!(err, ExportError::InvalidPrice { ref name, .. } if name == "Promo"));
        assert!(!path.exists());
    }

    #[test]
    fn test_all_prices_missing_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let reporter = RecordingReporter::new();

        let records = vec![ProductRecord::new("Teh Hijau", "", "N/A", 30)];
        assert!(service(&path, &reporter).export(&records).unwrap().is_none());
        assert!(!path.exists());
    }
}
