//! HTML parsing infrastructure
//!
//! Trait-based parsing of rendered listing pages: compiled selector chains with
//! ordered fallbacks, per-card extraction with sentinel values for missing
//! fields, and text normalization of the raw scraped values.

pub mod config;
pub mod context;
pub mod error;
pub mod normalizer;
pub mod product_list_parser;
pub mod strategy;

// Re-export public types
pub use config::{NormalizationConfig, ParsingConfig, ProductListSelectors, StrategySpec};
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use normalizer::{TextNormalizer, extract_unit};
pub use product_list_parser::{PageExtraction, ProductListParser};
pub use strategy::{FieldChain, FieldStrategy};

use scraper::Html;

/// Parser over an already parsed document, with contextual information
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;
}
