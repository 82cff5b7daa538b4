//! Product list parser
//!
//! Finds every product card on a rendered listing page and extracts one
//! `ProductRecord` per card through prioritized selector chains. Fields that
//! cannot be found fall back to sentinels, so every container yields a record.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::{NormalizationConfig, ParsingConfig, ProductListSelectors};
use super::normalizer::TextNormalizer;
use super::strategy::{FieldChain, compile_selector};
use super::{ContextualParser, ParseContext, ParsingResult};
use crate::domain::constants::sentinel;
use crate::domain::product::ProductRecord;

/// Records extracted from one listing page
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    /// Number of product containers found on the page
    pub containers_found: usize,
    /// Extracted records with their 1-based ordinal on the page
    pub items: Vec<(usize, ProductRecord)>,
}

impl PageExtraction {
    pub fn into_records(self) -> Vec<ProductRecord> {
        self.items.into_iter().map(|(_, record)| record).collect()
    }
}

/// Parser for extracting product information from listing pages
pub struct ProductListParser {
    /// Compiled CSS selectors for different page elements
    container_selector: Selector,
    name_chain: FieldChain,
    price_chain: FieldChain,
    sales_chain: FieldChain,
    normalizer: TextNormalizer,
}

impl ProductListParser {
    /// Create a new product list parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::from_config(&ParsingConfig::default())
    }

    pub fn from_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Self::with_config(&config.product_list_selectors, &config.normalization)
    }

    /// Create parser with custom selector configuration
    pub fn with_config(
        selectors: &ProductListSelectors,
        normalization: &NormalizationConfig,
    ) -> ParsingResult<Self> {
        Ok(Self {
            container_selector: compile_selector(&selectors.product_container)?,
            name_chain: FieldChain::from_specs("name", &selectors.name, sentinel::NOT_AVAILABLE)?,
            price_chain: FieldChain::from_specs("price", &selectors.price, sentinel::NOT_AVAILABLE)?,
            sales_chain: FieldChain::from_specs("sales", &selectors.sales, sentinel::NO_SALES)?,
            normalizer: TextNormalizer::new(normalization.clone()),
        })
    }

    /// Parse raw page HTML. The parsed document never outlives this call.
    pub fn parse_page(&self, html: &str, context: &ParseContext) -> PageExtraction {
        let document = Html::parse_document(html);
        self.parse_with_context(&document, context)
    }

    /// Extract one product card.
    ///
    /// A title made only of unit tokens ("(Pack of 3)") leaves an empty name;
    /// the record is kept so its price and sales still count.
    pub fn extract_item(&self, element: &ElementRef<'_>) -> ProductRecord {
        let raw_name = self.name_chain.resolve(element);
        let (name, unit) = self.normalizer.extract_unit(&raw_name);

        let price = self.price_chain.resolve(element);
        let sales = self.normalizer.clean_sales_number(&self.sales_chain.resolve(element));

        ProductRecord {
            name,
            unit,
            price,
            sales,
        }
    }
}

impl ContextualParser for ProductListParser {
    type Output = PageExtraction;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let items: Vec<(usize, ProductRecord)> = html
            .select(&self.container_selector)
            .enumerate()
            .map(|(offset, element)| (offset + 1, self.extract_item(&element)))
            .collect();

        debug!(
            "Extracted {} products from page {} ({})",
            items.len(),
            context.page_index,
            context.page_url
        );

        PageExtraction {
            containers_found: items.len(),
            items,
        }
    }
}
