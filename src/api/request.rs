//! Request types for the Gratuity Engine API.
//!
//! Request bodies carry the raw form fields of a [`RawGratuityInput`] at the
//! top level, plus an optional `as_of` reference date. When `as_of` is
//! omitted the handler uses today's UTC date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::RawGratuityInput;

/// Request body for the `/gratuity/calculate` and `/gratuity/validate`
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The raw calculation input.
    #[serde(flatten)]
    pub input: RawGratuityInput,
    /// Reference date for the future-start check.
    #[serde(default, alias = "asOf", skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Request body for the `/gratuity/project` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    /// The raw calculation input for the current service period.
    #[serde(flatten)]
    pub input: RawGratuityInput,
    /// Calendar years to add to the end date.
    #[serde(alias = "additionalYears")]
    pub additional_years: u32,
    /// Reference date for the future-start check.
    #[serde(default, alias = "asOf", skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}
