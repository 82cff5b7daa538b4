use serde::{Deserialize, Serialize};

use super::constants::sentinel;

/// Product information scraped from one product card on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title with unit/quantity tokens stripped
    pub name: String,
    /// Space-joined unit tokens ("250ML", "Pack of 3"), empty when none were found
    pub unit: String,
    /// Raw price text as displayed ("Rp12.500"); normalized at export time
    pub price: String,
    /// Units sold, 0 when the label was missing or unparseable
    pub sales: u64,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        price: impl Into<String>,
        sales: u64,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            price: price.into(),
            sales,
        }
    }

    /// Whether the price was never found on the product card
    pub fn has_missing_price(&self) -> bool {
        self.price == sentinel::NOT_AVAILABLE
    }
}

/// One row of the exported table
///
/// Field order and header names define the file layout: Product Name, Unit, Price, Sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Sales")]
    pub sales: u64,
}

impl ExportRow {
    /// Build an export row from a record whose price has already been normalized
    pub fn from_record(record: &ProductRecord, price: f64) -> Self {
        Self {
            product_name: record.name.clone(),
            unit: record.unit.clone(),
            price,
            sales: record.sales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_price_detection() {
        let missing = ProductRecord::new("Susu", "", "N/A", 0);
        let present = ProductRecord::new("Susu", "", "Rp5.000", 0);

        assert!(missing.has_missing_price());
        assert!(!present.has_missing_price());
    }

    #[test]
    fn test_export_row_copies_record_fields() {
        let record = ProductRecord::new("Susu UHT Coklat", "250ML", "Rp5.000", 150);
        let row = ExportRow::from_record(&record, 5000.0);

        assert_eq!(row.product_name, "Susu UHT Coklat");
        assert_eq!(row.unit, "250ML");
        assert!((row.price - 5000.0).abs() < f64::EPSILON);
        assert_eq!(row.sales, 150);
    }
}
