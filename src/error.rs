//! Error types for the Gratuity Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the conditions that can occur while loading rule tables or running
//! the calculation core. Input problems found by the validation boundary are
//! reported as [`CalculatorError`](crate::models::CalculatorError) values
//! instead and never surface as an `EngineError`.

use thiserror::Error;

/// The main error type for the Gratuity Engine.
///
/// # Example
///
/// ```
/// use gratuity_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/accrual.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/accrual.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The rule tables are internally inconsistent.
    #[error("Invalid rule set: {message}")]
    InvalidRuleSet {
        /// A description of the inconsistency.
        message: String,
    },

    /// A jurisdiction code has no entry in the jurisdiction table.
    #[error("Jurisdiction not found: {code}")]
    JurisdictionNotFound {
        /// The jurisdiction code that was not found.
        code: String,
    },

    /// A typed input value could not be constructed from its raw form.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred (e.g. decimal overflow).
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::CalculationError`] describing an arithmetic overflow.
    pub fn overflow(operation: &str) -> Self {
        EngineError::CalculationError {
            message: format!("arithmetic overflow while computing {}", operation),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
