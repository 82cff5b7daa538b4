//! Parsing error types
//!
//! Error types for selector configuration and text normalization.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Selector chain '{field}' has no selectors")]
    EmptySelectorChain { field: String },

    #[error("Invalid price text '{raw}': {reason}")]
    InvalidPrice { raw: String, reason: String },
}

impl ParsingError {
    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid price error
    pub fn invalid_price(raw: &str, reason: impl ToString) -> Self {
        Self::InvalidPrice {
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
