//! Ordered extraction strategies for product card fields
//!
//! A field is resolved by trying its strategies in order; the first one that
//! produces non-empty text wins, otherwise the chain's sentinel is used.

use scraper::{ElementRef, Selector};
use tracing::trace;

use super::config::StrategySpec;
use super::error::{ParsingError, ParsingResult};

/// A single way of locating a field inside a product container
#[derive(Debug, Clone)]
pub enum FieldStrategy {
    /// Text of the first descendant matching the selector
    Css(Selector),
    /// Text of the first descendant matching the selector whose text contains `marker`
    ContainsText { selector: Selector, marker: String },
}

impl FieldStrategy {
    /// Compile a strategy from its configuration form
    pub fn from_spec(spec: &StrategySpec) -> ParsingResult<Self> {
        match spec {
            StrategySpec::Css(selector) => Ok(Self::Css(compile_selector(selector)?)),
            StrategySpec::ContainsText { selector, contains } => Ok(Self::ContainsText {
                selector: compile_selector(selector)?,
                marker: contains.clone(),
            }),
        }
    }

    /// Try this strategy against a container element
    pub fn extract(&self, element: &ElementRef<'_>) -> Option<String> {
        match self {
            Self::Css(selector) => element
                .select(selector)
                .next()
                .map(|e| element_text(&e))
                .filter(|text| !text.is_empty()),
            Self::ContainsText { selector, marker } => element
                .select(selector)
                .map(|e| element_text(&e))
                .find(|text| text.contains(marker.as_str())),
        }
    }
}

/// Named, prioritized list of strategies with a sentinel fallback
#[derive(Debug, Clone)]
pub struct FieldChain {
    field: &'static str,
    strategies: Vec<FieldStrategy>,
    fallback: &'static str,
}

impl FieldChain {
    /// Compile a chain from configuration; an empty chain is a configuration error
    pub fn from_specs(
        field: &'static str,
        specs: &[StrategySpec],
        fallback: &'static str,
    ) -> ParsingResult<Self> {
        if specs.is_empty() {
            return Err(ParsingError::EmptySelectorChain {
                field: field.to_string(),
            });
        }

        let strategies = specs
            .iter()
            .map(FieldStrategy::from_spec)
            .collect::<ParsingResult<Vec<_>>>()?;

        Ok(Self {
            field,
            strategies,
            fallback,
        })
    }

    /// Append a lower-priority strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: FieldStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub const fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// First successful strategy result, if any
    pub fn find(&self, element: &ElementRef<'_>) -> Option<String> {
        self.strategies.iter().enumerate().find_map(|(i, strategy)| {
            let hit = strategy.extract(element);
            if hit.is_some() {
                trace!("Field '{}' resolved by strategy {}", self.field, i);
            }
            hit
        })
    }

    /// First successful strategy result, or the sentinel
    pub fn resolve(&self, element: &ElementRef<'_>) -> String {
        self.find(element)
            .unwrap_or_else(|| self.fallback.to_string())
    }
}

/// Compile a CSS selector string
pub fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Concatenated, trimmed text content of an element
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_card(html: &Html) -> ElementRef<'_> {
        let selector = Selector::parse("div.card").unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_first_strategy_wins() {
        let html = Html::parse_fragment(
            r#"<div class="card"><p class="primary">Primary</p><p class="secondary">Secondary</p></div>"#,
        );
        let chain = FieldChain::from_specs(
            "name",
            &[StrategySpec::css("p.primary"), StrategySpec::css("p.secondary")],
            "N/A",
        )
        .unwrap();

        assert_eq!(chain.resolve(&first_card(&html)), "Primary");
    }

    #[test]
    fn test_falls_back_in_order_then_to_sentinel() {
        let html = Html::parse_fragment(r#"<div class="card"><p class="secondary"> Secondary </p></div>"#);
        let chain = FieldChain::from_specs(
            "name",
            &[StrategySpec::css("p.primary"), StrategySpec::css("p.secondary")],
            "N/A",
        )
        .unwrap();
        assert_eq!(chain.resolve(&first_card(&html)), "Secondary");

        let empty = Html::parse_fragment(r#"<div class="card"></div>"#);
        assert_eq!(chain.resolve(&first_card(&empty)), "N/A");
    }

    #[test]
    fn test_contains_text_strategy() {
        let html = Html::parse_fragment(
            r#"<div class="card"><span>Jakarta</span><span>150+ terjual</span></div>"#,
        );
        let chain = FieldChain::from_specs(
            "sales",
            &[StrategySpec::css("span.prd_label-integrity")],
            "0",
        )
        .unwrap()
        .with_strategy(FieldStrategy::ContainsText {
            selector: Selector::parse("span").unwrap(),
            marker: "terjual".to_string(),
        });

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve(&first_card(&html)), "150+ terjual");
    }

    #[test]
    fn test_empty_chain_is_rejected() {
        let err = FieldChain::from_specs("price", &[], "N/A").unwrap_err();
        assert_eq!(err, ParsingError::EmptySelectorChain { field: "price".to_string() });
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let err = FieldChain::from_specs("price", &[StrategySpec::css("div[")], "N/A").unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { .. }));
    }
}
