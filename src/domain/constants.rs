//! Storefront constants
//!
//! Site characteristics and sentinel values used across parsing, crawling and export.

/// Sentinel values used when a field could not be scraped
pub mod sentinel {
    /// Placeholder for text fields (name, price) that were not found
    pub const NOT_AVAILABLE: &str = "N/A";

    /// Raw sales text used when no sales label was found (normalizes to 0)
    pub const NO_SALES: &str = "0";
}

/// Tokopedia shop page characteristics
pub mod storefront {
    /// Localized "sold" marker appended to sales counts ("150+ terjual")
    pub const SALES_MARKER: &str = "terjual";

    /// Currency prefix shown in front of every price ("Rp12.500")
    pub const CURRENCY_PREFIX: &str = "Rp";

    /// Thousands separator used in rupiah prices
    pub const THOUSANDS_SEPARATOR: char = '.';

    /// Unit abbreviations recognised after a numeric quantity.
    ///
    /// Longer tokens come first so `250GR` is taken as one token instead of `250G` + `R`.
    pub const UNIT_TOKENS: &[&str] = &["KG", "GR", "ML", "G", "PCS", "PACK", "SACHET"];
}

/// Export column headers, in file order
pub mod export {
    pub const COLUMN_PRODUCT_NAME: &str = "Product Name";
    pub const COLUMN_UNIT: &str = "Unit";
    pub const COLUMN_PRICE: &str = "Price";
    pub const COLUMN_SALES: &str = "Sales";

    /// Maximum characters of a product name shown in progress output
    pub const NAME_PREVIEW_CHARS: usize = 50;
}
