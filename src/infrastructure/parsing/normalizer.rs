//! Text normalization for scraped product fields
//!
//! Pure conversions from raw listing text into structured values:
//! unit/quantity extraction from titles, sales label cleaning and price parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use super::config::NormalizationConfig;
use super::error::{ParsingError, ParsingResult};
use crate::domain::constants::storefront::UNIT_TOKENS;

/// Parenthesized groups, or a quantity followed by one or more unit abbreviations
static UNIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\(.*?\)|\d+\s*(?:{})+", UNIT_TOKENS.join("|"));
    Regex::new(&pattern).expect("unit pattern is a valid regex")
});

/// Split a product title into a clean name and its unit tokens.
///
/// Every parenthesized group and every `<number><unit>` token is removed from the
/// name (first occurrence per match) and collected in encounter order. The unit
/// string is the space-joined tokens with outer parentheses stripped.
///
/// ```
/// use storefront_crawler::infrastructure::parsing::extract_unit;
///
/// let (name, unit) = extract_unit("Susu UHT 250ML Coklat");
/// assert_eq!(name, "Susu UHT Coklat");
/// assert_eq!(unit, "250ML");
/// ```
pub fn extract_unit(name: &str) -> (String, String) {
    let units: Vec<&str> = UNIT_PATTERN.find_iter(name).map(|m| m.as_str()).collect();

    if units.is_empty() {
        return (name.trim().to_string(), String::new());
    }

    let mut clean = name.to_string();
    for unit in &units {
        clean = clean.replacen(unit, "", 1);
    }

    let unit = units
        .join(" ")
        .trim_matches(|c| c == '(' || c == ')')
        .to_string();

    (collapse_whitespace(&clean), unit)
}

/// Join whitespace-separated words with single spaces
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Configured normalizer for sales labels and prices
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizationConfig,
}

impl TextNormalizer {
    pub const fn new(config: NormalizationConfig) -> Self {
        Self { config }
    }

    /// See [`extract_unit`]
    pub fn extract_unit(&self, name: &str) -> (String, String) {
        extract_unit(name)
    }

    /// Turn a sales label ("150+ terjual") into a count.
    ///
    /// Removes the sales marker and plus signs, then parses what is left.
    /// Anything that is not a plain non-negative integer yields 0.
    pub fn clean_sales_number(&self, text: &str) -> u64 {
        let cleaned = text
            .replace(self.config.sales_marker.as_str(), "")
            .replace('+', "");

        cleaned.trim().parse::<u64>().unwrap_or(0)
    }

    /// Parse displayed price text ("Rp12.500") into a number.
    pub fn parse_price(&self, text: &str) -> ParsingResult<f64> {
        let trimmed = text.trim();
        let without_prefix = trimmed
            .strip_prefix(self.config.currency_prefix.as_str())
            .unwrap_or(trimmed);

        let digits: String = without_prefix
            .chars()
            .filter(|c| *c != self.config.thousands_separator && !c.is_whitespace())
            .collect();

        if digits.is_empty() {
            return Err(ParsingError::invalid_price(text, "no digits after stripping currency"));
        }

        let price = digits
            .parse::<f64>()
            .map_err(|e| ParsingError::invalid_price(text, e))?;

        if !price.is_finite() || price.is_sign_negative() {
            return Err(ParsingError::invalid_price(text, "price must be a finite non-negative number"));
        }

        Ok(price)
    }
}
