//! Error types for product-page parsing
//!
//! Extraction failures are control-flow signals in the export loop: a page
//! without the embedded data block is skipped with a warning, never a
//! process failure.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("No embedded product data block found in page")]
    DataBlockNotFound,

    #[error("Invalid extraction pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ParsingError {
    /// Create an invalid pattern error from a regex compilation failure.
    pub fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid selector error from a selector compilation failure.
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the export loop can continue with the next page after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::DataBlockNotFound => true,
            Self::InvalidPattern { .. } => false,
            Self::InvalidSelector { .. } => false,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
