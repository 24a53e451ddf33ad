//! Core data models for the Gratuity Engine.
//!
//! This module contains the input, result and diagnostic types shared by the
//! validation boundary, the calculation core and the HTTP layer.

mod diagnostics;
mod gratuity_result;
mod input;
mod regime;

pub use diagnostics::{CalculationOutcome, CalculatorError, ErrorCode, Severity, ValidationResult};
pub use gratuity_result::{AuditStep, BreakdownSegment, GratuityResult};
pub use input::{
    ContractType, DATE_FORMAT, DEFAULT_FREE_ZONE, GratuityInput, RawGratuityInput,
    TerminationReason,
};
pub(crate) use input::normalize_code;
pub use regime::Regime;
