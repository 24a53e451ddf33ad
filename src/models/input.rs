//! Input models for a gratuity calculation.
//!
//! Two representations exist. [`RawGratuityInput`] carries loosely-typed form
//! values exactly as a presentation layer supplies them, and is the only shape
//! accepted at the validation boundary. [`GratuityInput`] is the typed value
//! the calculation core works on; it is produced by validation and never
//! constructed from unchecked strings.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;

/// The jurisdiction code used when no free zone is supplied.
pub const DEFAULT_FREE_ZONE: &str = "mainland";

/// The date format accepted for start and end dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The type of employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Open-ended contract with no fixed end date.
    Unlimited,
    /// Fixed-term contract.
    Limited,
}

impl ContractType {
    /// All contract types, in declaration order.
    pub const ALL: [ContractType; 2] = [ContractType::Unlimited, ContractType::Limited];

    /// Returns the wire code for this contract type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Unlimited => "unlimited",
            ContractType::Limited => "limited",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = EngineError;

    /// Parses a contract type, ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use gratuity_engine::models::ContractType;
    ///
    /// assert_eq!("Unlimited".parse::<ContractType>().unwrap(), ContractType::Unlimited);
    /// assert!("permanent".parse::<ContractType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = normalize_code(s);
        ContractType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == code)
            .ok_or_else(|| EngineError::InvalidInput {
                field: "contract_type".to_string(),
                message: format!("unknown contract type '{}'", s.trim()),
            })
    }
}

/// The reason employment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The employee resigned.
    Resignation,
    /// The employer terminated the contract.
    Termination,
    /// A fixed-term contract reached its end date.
    ContractEnd,
    /// Both parties agreed to end the contract.
    MutualAgreement,
}

impl TerminationReason {
    /// All termination reasons, in declaration order.
    pub const ALL: [TerminationReason; 4] = [
        TerminationReason::Resignation,
        TerminationReason::Termination,
        TerminationReason::ContractEnd,
        TerminationReason::MutualAgreement,
    ];

    /// Returns the wire code for this termination reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Resignation => "resignation",
            TerminationReason::Termination => "termination",
            TerminationReason::ContractEnd => "contract_end",
            TerminationReason::MutualAgreement => "mutual_agreement",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerminationReason {
    type Err = EngineError;

    /// Parses a termination reason. Hyphens and spaces are accepted in place
    /// of underscores, so `"contract-end"` and `"Contract End"` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = normalize_code(s);
        TerminationReason::ALL
            .into_iter()
            .find(|tr| tr.as_str() == code)
            .ok_or_else(|| EngineError::InvalidInput {
                field: "termination_reason".to_string(),
                message: format!("unknown termination reason '{}'", s.trim()),
            })
    }
}

/// Lowercases a code and folds `-` and spaces into `_`.
pub(crate) fn normalize_code(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Loosely-typed calculation input as received from a form or JSON body.
///
/// Every field is optional on the wire; absent fields become empty strings and
/// are reported by validation as `MISSING_FIELD`. The salary accepts either a
/// JSON string or a JSON number.
///
/// # Example
///
/// ```
/// use gratuity_engine::models::RawGratuityInput;
///
/// let raw: RawGratuityInput = serde_json::from_str(r#"{
///     "contractType": "unlimited",
///     "basicSalary": 10000,
///     "startDate": "2015-01-01",
///     "endDate": "2022-01-01",
///     "terminationReason": "termination"
/// }"#).unwrap();
/// assert_eq!(raw.basic_salary, "10000");
/// assert!(raw.free_zone.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGratuityInput {
    /// Contract type code (`unlimited` or `limited`).
    #[serde(default, alias = "contractType")]
    pub contract_type: String,
    /// Monthly basic salary as decimal text.
    #[serde(default, alias = "basicSalary", deserialize_with = "deserialize_loose_string")]
    pub basic_salary: String,
    /// First day of service, `YYYY-MM-DD`.
    #[serde(default, alias = "startDate")]
    pub start_date: String,
    /// Last day of service, `YYYY-MM-DD`.
    #[serde(default, alias = "endDate")]
    pub end_date: String,
    /// Termination reason code.
    #[serde(default, alias = "terminationReason")]
    pub termination_reason: String,
    /// Free-zone jurisdiction code; mainland when absent.
    #[serde(default, alias = "freeZone", skip_serializing_if = "Option::is_none")]
    pub free_zone: Option<String>,
}

/// Accepts a JSON string, integer or float and keeps its textual form.
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Missing(()),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Unsigned(n) => n.to_string(),
        Loose::Signed(n) => n.to_string(),
        Loose::Float(n) => n.to_string(),
        Loose::Missing(()) => String::new(),
    })
}

/// Validated, strongly-typed calculation input.
///
/// Values of this type are produced by the validation boundary and satisfy:
/// `basic_salary > 0`, `end_date > start_date`, and `free_zone` is a
/// normalised lowercase code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratuityInput {
    /// The contract type.
    pub contract_type: ContractType,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// First day of service.
    pub start_date: NaiveDate,
    /// Last day of service.
    pub end_date: NaiveDate,
    /// Why employment ended.
    pub termination_reason: TerminationReason,
    /// Normalised free-zone code.
    pub free_zone: String,
}

impl GratuityInput {
    /// Returns a copy of this input with a different end date.
    pub fn with_end_date(&self, end_date: NaiveDate) -> Self {
        Self {
            end_date,
            ..self.clone()
        }
    }
}

impl From<&GratuityInput> for RawGratuityInput {
    fn from(input: &GratuityInput) -> Self {
        RawGratuityInput {
            contract_type: input.contract_type.as_str().to_string(),
            basic_salary: input.basic_salary.to_string(),
            start_date: input.start_date.format(DATE_FORMAT).to_string(),
            end_date: input.end_date.format(DATE_FORMAT).to_string(),
            termination_reason: input.termination_reason.as_str().to_string(),
            free_zone: Some(input.free_zone.clone()),
        }
    }
}
