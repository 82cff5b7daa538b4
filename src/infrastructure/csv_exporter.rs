//! CSV file output for export rows

use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use super::config::{ExportConfig, defaults};
use crate::domain::product::ExportRow;

/// Writes `ExportRow`s as a headed CSV table
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(defaults::DELIMITER)
    }
}

impl CsvExporter {
    pub fn new(delimiter: char) -> Self {
        let delimiter = u8::try_from(delimiter).unwrap_or_else(|_| {
            warn!("Delimiter {:?} is not a single byte, using ','", delimiter);
            b','
        });
        Self { delimiter }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.delimiter)
    }

    /// Write the header and every row to `path`, replacing any existing file
    pub fn write_file(&self, path: &Path, rows: &[ExportRow]) -> csv::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        self.write_to(file, rows)?;
        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Write the header and every row to any writer
    pub fn write_to<W: Write>(&self, writer: W, rows: &[ExportRow]) -> csv::Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_writer(writer);

        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::export::{COLUMN_PRICE, COLUMN_PRODUCT_NAME, COLUMN_SALES, COLUMN_UNIT};

    fn rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                product_name: "Susu UHT Coklat".to_string(),
                unit: "250ML".to_string(),
                price: 5500.0,
                sales: 150,
            },
            ExportRow {
                product_name: "Kopi, Bubuk".to_string(),
                unit: String::new(),
                price: 45000.5,
                sales: 0,
            },
        ]
    }

    #[test]
    fn test_header_and_quoting() {
        let mut buffer = Vec::new();
        CsvExporter::default().write_to(&mut buffer, &rows()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], [COLUMN_PRODUCT_NAME, COLUMN_UNIT, COLUMN_PRICE, COLUMN_SALES].join(","));
        assert_eq!(lines[1], "Susu UHT Coklat,250ML,5500.0,150");
        assert_eq!(lines[2], "\"Kopi, Bubuk\",,45000.5,0");
    }

    #[test]
    fn test_custom_delimiter() {
        let mut buffer = Vec::new();
        CsvExporter::new(';').write_to(&mut buffer, &rows()[..1]).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with("Product Name;Unit;Price;Sales\n"));
    }

    #[test]
    fn test_write_file_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("products.csv");

        CsvExporter::default().write_file(&path, &rows()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<ExportRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(read, rows());
    }
}
