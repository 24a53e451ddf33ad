//! Structured diagnostics produced by validation and the safe calculation
//! wrapper.
//!
//! Diagnostics are plain data. They are returned inside [`ValidationResult`]
//! and [`CalculationOutcome`] values rather than raised as Rust errors, so a
//! caller always receives a well-formed response object.

use serde::{Deserialize, Serialize};

/// Machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required field was empty or absent.
    MissingField,
    /// The salary is not a decimal number.
    InvalidSalary,
    /// The salary is below zero.
    NegativeSalary,
    /// The salary is exactly zero.
    ZeroSalary,
    /// The salary exceeds the hard ceiling.
    SalaryOutOfRange,
    /// The salary is below the plausibility band.
    SalaryUnusuallyLow,
    /// The salary is above the plausibility band.
    SalaryUnusuallyHigh,
    /// The start date is not a valid calendar date.
    InvalidStartDate,
    /// The end date is not a valid calendar date.
    InvalidEndDate,
    /// The start date lies after the reference date.
    FutureStartDate,
    /// The end date is on or before the start date.
    EndDateBeforeStartDate,
    /// The service period exceeds the sanity bound.
    ServicePeriodTooLong,
    /// The service period is shorter than the qualifying minimum.
    ServiceUnderMinimum,
    /// The contract type is not recognised.
    InvalidContractType,
    /// The termination reason is not recognised.
    InvalidTerminationReason,
    /// The free-zone code is malformed.
    InvalidFreeZone,
    /// The free-zone code is well-formed but not in the jurisdiction table.
    UnknownFreeZone,
    /// The jurisdiction's formula is an approximation.
    JurisdictionApproximated,
    /// An internal fault occurred during calculation.
    CalculationFailed,
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the calculation.
    Error,
    /// Attached to a result without blocking it.
    Warning,
    /// Informational only.
    Info,
}

/// A single diagnostic.
///
/// # Example
///
/// ```
/// use gratuity_engine::models::{CalculatorError, ErrorCode, Severity};
///
/// let error = CalculatorError::error(ErrorCode::NegativeSalary, "Basic salary cannot be negative")
///     .with_field("basic_salary")
///     .with_suggestion("Enter the monthly basic salary as a positive amount");
///
/// assert_eq!(error.severity, Severity::Error);
/// assert_eq!(error.field.as_deref(), Some("basic_salary"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorError {
    /// The diagnostic code.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    /// How serious the diagnostic is.
    pub severity: Severity,
    /// The input field the diagnostic refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Additional detail, such as the offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// How to correct the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl CalculatorError {
    /// Creates a diagnostic with the given severity.
    pub fn new(code: ErrorCode, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code,
            message: message.into(),
            severity,
            field: None,
            details: None,
            suggestion: None,
        }
    }

    /// Creates a blocking error.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Error)
    }

    /// Creates a non-blocking warning.
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Warning)
    }

    /// Sets the field this diagnostic refers to.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the detail text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Sets the suggestion text.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns true if this diagnostic blocks calculation.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The outcome of validating a raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when there are no blocking errors.
    pub is_valid: bool,
    /// Blocking errors, in the order they were found.
    pub errors: Vec<CalculatorError>,
    /// Non-blocking warnings, in the order they were found.
    pub warnings: Vec<CalculatorError>,
}

impl ValidationResult {
    /// Builds a result from collected errors and warnings.
    pub fn from_parts(errors: Vec<CalculatorError>, warnings: Vec<CalculatorError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Returns the first blocking error, if any.
    pub fn first_error(&self) -> Option<&CalculatorError> {
        self.errors.first()
    }

    /// Returns true if any error or warning carries the given code.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|e| e.code == code)
    }
}

/// The result of a calculation that never raises.
///
/// Exactly one of `data` and `error` is present: `data` when `success` is
/// true, `error` otherwise. Warnings may accompany either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOutcome<T> {
    /// Whether the calculation produced a result.
    pub success: bool,
    /// The result, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// The blocking error, on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalculatorError>,
    /// Non-blocking warnings.
    #[serde(default)]
    pub warnings: Vec<CalculatorError>,
}

impl<T> CalculationOutcome<T> {
    /// Builds a successful outcome.
    pub fn success(data: T, warnings: Vec<CalculatorError>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            warnings,
        }
    }

    /// Builds a failed outcome.
    pub fn failure(error: CalculatorError, warnings: Vec<CalculatorError>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            warnings,
        }
    }
}
