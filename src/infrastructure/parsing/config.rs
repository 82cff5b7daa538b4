//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for CSS selectors and text normalization.
//! Every field is a prioritized fallback chain: the first strategy that
//! yields text wins, so new page layouts are handled by appending entries.

use serde::{Deserialize, Serialize};

use crate::domain::constants::storefront;

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Product list selectors
    pub product_list_selectors: ProductListSelectors,

    /// Text normalization settings
    pub normalization: NormalizationConfig,
}

/// One extraction strategy as written in configuration
///
/// A plain string is a CSS selector; a table with `selector` and `contains`
/// picks the first match whose text contains the marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategySpec {
    Css(String),
    ContainsText { selector: String, contains: String },
}

impl StrategySpec {
    pub fn css(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }

    pub fn contains_text(selector: &str, marker: &str) -> Self {
        Self::ContainsText {
            selector: selector.to_string(),
            contains: marker.to_string(),
        }
    }
}

/// CSS selectors for product list pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductListSelectors {
    /// Selector for product card containers, also used as the page-loaded marker
    pub product_container: String,

    /// Strategies for the product name
    pub name: Vec<StrategySpec>,

    /// Strategies for the displayed price
    pub price: Vec<StrategySpec>,

    /// Strategies for the sales label
    pub sales: Vec<StrategySpec>,

    /// Selector for the "next page" control
    pub next_page: String,
}

impl Default for ProductListSelectors {
    fn default() -> Self {
        Self {
            product_container: "div.css-54k5sq".to_string(),
            name: vec![
                StrategySpec::css("div[data-testid='linkProductName']"),
                StrategySpec::css(".prd_link-product-name"),
            ],
            price: vec![
                StrategySpec::css("div[data-testid='linkProductPrice']"),
                StrategySpec::css(".prd_link-product-price"),
            ],
            sales: vec![
                StrategySpec::css("span.prd_label-integrity"),
                StrategySpec::contains_text("span", storefront::SALES_MARKER),
            ],
            next_page: "a[data-testid='btnShopProductPageNext']".to_string(),
        }
    }
}

/// Text normalization settings for raw scraped values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Marker removed from sales labels before parsing ("terjual")
    pub sales_marker: String,

    /// Currency prefix stripped from prices ("Rp")
    pub currency_prefix: String,

    /// Thousands separator removed from prices ('.')
    pub thousands_separator: char,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            sales_marker: storefront::SALES_MARKER.to_string(),
            currency_prefix: storefront::CURRENCY_PREFIX.to_string(),
            thousands_separator: storefront::THOUSANDS_SEPARATOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chains_are_prioritized() {
        let selectors = ProductListSelectors::default();
        assert_eq!(selectors.name.len(), 2);
        assert_eq!(selectors.name[0], StrategySpec::css("div[data-testid='linkProductName']"));
        assert_eq!(selectors.sales[1], StrategySpec::contains_text("span", "terjual"));
    }

    #[test]
    fn test_strategy_spec_deserializes_both_shapes() {
        let json = r#"["span.sold", {"selector": "span", "contains": "sold"}]"#;
        let specs: Vec<StrategySpec> = serde_json::from_str(json).unwrap();

        assert_eq!(specs[0], StrategySpec::css("span.sold"));
        assert_eq!(specs[1], StrategySpec::contains_text("span", "sold"));
    }
}
