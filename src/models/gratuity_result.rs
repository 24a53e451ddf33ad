//! Gratuity result models.
//!
//! This module contains the [`GratuityResult`] type and the structures that
//! make up its audit breakdown: accrual segments and the step-by-step audit
//! trace recording each rule the engine applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// One accrual segment of the gratuity breakdown.
///
/// # Example
///
/// ```
/// use gratuity_engine::models::BreakdownSegment;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let segment = BreakdownSegment {
///     period: "First 5 years".to_string(),
///     years: Decimal::from(5),
///     days_per_year: Decimal::from(21),
///     daily_rate: Decimal::from_str("333.33").unwrap(),
///     amount: Decimal::from_str("34999.65").unwrap(),
/// };
/// assert_eq!(segment.daily_rate * segment.days_per_year * segment.years, segment.amount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSegment {
    /// Human-readable label for the service range this segment covers.
    pub period: String,
    /// Years of service accrued in this segment.
    pub years: Decimal,
    /// Days of wage accrued per year of service.
    pub days_per_year: Decimal,
    /// The daily wage used for this segment.
    pub daily_rate: Decimal,
    /// `daily_rate × days_per_year × years`, rounded to 2 decimal places.
    pub amount: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the legal provision for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete result of a gratuity calculation.
///
/// The result is a pure function of the input: it carries no identifiers or
/// timestamps, so identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratuityResult {
    /// The payable gratuity, rounded half-up to 2 decimal places.
    pub total_gratuity: Decimal,
    /// Whole calendar years of service.
    pub years_of_service: u32,
    /// Remaining whole calendar months after `years_of_service`.
    pub months_of_service: u32,
    /// Remaining days after `months_of_service`.
    pub days_of_service: u32,
    /// Exact number of days between the start and end dates.
    pub total_days: i64,
    /// Fractional service years used for accrual (`total_days / 365.25`, 2 dp).
    pub total_years: Decimal,
    /// The accrual segments, in service order.
    pub breakdown: Vec<BreakdownSegment>,
    /// The daily wage (`basic_salary / 30`, 2 dp).
    pub daily_rate: Decimal,
    /// Sum of breakdown amounts, before entitlement scaling and capping.
    pub unscaled_gratuity: Decimal,
    /// The statutory ceiling for this salary.
    pub max_gratuity: Decimal,
    /// True when the scaled amount was clamped to `max_gratuity`.
    pub max_gratuity_exceeded: bool,
    /// Fraction of the accrued amount that is payable.
    pub entitlement_percentage: Decimal,
    /// The accrual regime that was applied.
    pub regime: Regime,
    /// The jurisdiction code the regime was selected for.
    pub jurisdiction: String,
    /// Legal provisions relied on, in the order they were applied.
    pub legal_references: Vec<String>,
    /// Explanation for a zero result, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The audit trace of every rule applied.
    pub audit_steps: Vec<AuditStep>,
}

impl GratuityResult {
    /// Returns the sum of all breakdown segment amounts.
    pub fn breakdown_total(&self) -> Decimal {
        self.breakdown.iter().map(|s| s.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result() -> GratuityResult {
        GratuityResult {
            total_gratuity: dec("54999.45"),
            years_of_service: 7,
            months_of_service: 0,
            days_of_service: 0,
            total_days: 2557,
            total_years: dec("7.00"),
            breakdown: vec![
                BreakdownSegment {
                    period: "First 5 years".to_string(),
                    years: dec("5"),
                    days_per_year: dec("21"),
                    daily_rate: dec("333.33"),
                    amount: dec("34999.65"),
                },
                BreakdownSegment {
                    period: "After 5 years".to_string(),
                    years: dec("2.00"),
                    days_per_year: dec("30"),
                    daily_rate: dec("333.33"),
                    amount: dec("19999.80"),
                },
            ],
            daily_rate: dec("333.33"),
            unscaled_gratuity: dec("54999.45"),
            max_gratuity: dec("240000"),
            max_gratuity_exceeded: false,
            entitlement_percentage: dec("1"),
            regime: Regime::Mainland,
            jurisdiction: "mainland".to_string(),
            legal_references: vec![],
            reason: None,
            audit_steps: vec![],
        }
    }

    #[test]
    fn test_breakdown_total_sums_segments() {
        let result = create_sample_result();
        assert_eq!(result.breakdown_total(), dec("54999.45"));
        assert_eq!(result.breakdown_total(), result.unscaled_gratuity);
    }

    #[test]
    fn test_result_serializes_decimals_as_strings() {
        let result = create_sample_result();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_gratuity"], "54999.45");
        assert_eq!(json["breakdown"][1]["amount"], "19999.80");
        assert_eq!(json["regime"], "mainland");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = create_sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let back: GratuityResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
