//! Gratuity accrual calculation.
//!
//! This module turns a regime and a fractional service duration into a daily
//! wage and a list of accrual segments.
//!
//! ## Formula
//!
//! - Daily wage: `basic_salary / 30`, rounded to 2 decimal places
//! - Mainland: 21 days per year for the first 5 years, 30 days per year after
//! - Flat rate (DIFC/ADGM): 21 days per year for the whole period, no break
//!
//! Each segment amount is `daily_rate × days_per_year × years`, rounded to
//! 2 decimal places; the unscaled gratuity is the sum of segment amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AccrualRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, BreakdownSegment, Regime};

use super::rounding::round_currency;

/// The result of accrual calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResult {
    /// The daily wage.
    pub daily_rate: Decimal,
    /// One segment per tier with a non-zero share of the service period.
    pub segments: Vec<BreakdownSegment>,
    /// Sum of segment amounts.
    pub unscaled_total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the daily wage for a monthly salary.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if `days_per_month` is zero.
pub fn daily_rate(basic_salary: Decimal, days_per_month: Decimal) -> EngineResult<Decimal> {
    basic_salary
        .checked_div(days_per_month)
        .map(round_currency)
        .ok_or_else(|| EngineError::overflow("daily rate"))
}

/// Calculates accrued gratuity segments for a regime.
///
/// # Arguments
///
/// * `rules` - The accrual rules holding the tier tables
/// * `regime` - The regime selected for the jurisdiction
/// * `total_years` - Fractional service years (already rounded)
/// * `basic_salary` - Monthly basic salary
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] on decimal overflow.
///
/// # Examples
///
/// ```
/// use gratuity_engine::calculation::accrue;
/// use gratuity_engine::config::RuleSet;
/// use gratuity_engine::models::Regime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rules = RuleSet::uae();
/// let result = accrue(
///     &rules.accrual,
///     Regime::Mainland,
///     Decimal::from(7),
///     Decimal::from(10000),
///     3,
/// ).unwrap();
///
/// assert_eq!(result.daily_rate, Decimal::from_str("333.33").unwrap());
/// assert_eq!(result.segments.len(), 2);
/// assert_eq!(result.segments[0].amount, Decimal::from_str("34999.65").unwrap());
/// assert_eq!(result.segments[1].amount, Decimal::from_str("19999.80").unwrap());
/// assert_eq!(result.unscaled_total, Decimal::from_str("54999.45").unwrap());
/// ```
pub fn accrue(
    rules: &AccrualRules,
    regime: Regime,
    total_years: Decimal,
    basic_salary: Decimal,
    step_number: u32,
) -> EngineResult<AccrualResult> {
    let daily_rate = daily_rate(basic_salary, rules.days_per_month)?;

    let mut segments = Vec::new();
    let mut lower_bound = Decimal::ZERO;

    for tier in rules.tiers_for(regime) {
        let upper = tier
            .up_to_years
            .map_or(total_years, |bound| bound.min(total_years));
        let years = (upper - lower_bound).max(Decimal::ZERO);

        if years > Decimal::ZERO {
            let amount = daily_rate
                .checked_mul(tier.days_per_year)
                .and_then(|v| v.checked_mul(years))
                .map(round_currency)
                .ok_or_else(|| EngineError::overflow("segment amount"))?;

            segments.push(BreakdownSegment {
                period: tier.label.clone(),
                years,
                days_per_year: tier.days_per_year,
                daily_rate,
                amount,
            });
        }

        match tier.up_to_years {
            Some(bound) if bound < total_years => lower_bound = bound,
            _ => break,
        }
    }

    let unscaled_total = segments
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.amount))
        .ok_or_else(|| EngineError::overflow("unscaled gratuity"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "gratuity_accrual".to_string(),
        rule_name: "Gratuity Accrual".to_string(),
        clause_ref: rules.clause.clone(),
        input: serde_json::json!({
            "regime": regime.as_str(),
            "total_years": total_years.to_string(),
            "basic_salary": basic_salary.to_string()
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.to_string(),
            "segments": segments
                .iter()
                .map(|s| serde_json::json!({
                    "period": s.period,
                    "years": s.years.to_string(),
                    "days_per_year": s.days_per_year.to_string(),
                    "amount": s.amount.to_string()
                }))
                .collect::<Vec<_>>(),
            "unscaled_total": unscaled_total.to_string()
        }),
        reasoning: accrual_reasoning(basic_salary, rules.days_per_month, daily_rate, &segments),
    };

    Ok(AccrualResult {
        daily_rate,
        segments,
        unscaled_total,
        audit_step,
    })
}

fn accrual_reasoning(
    basic_salary: Decimal,
    days_per_month: Decimal,
    daily_rate: Decimal,
    segments: &[BreakdownSegment],
) -> String {
    let mut parts = vec![format!(
        "Daily rate: AED {} / {} = AED {}",
        basic_salary.normalize(),
        days_per_month.normalize(),
        daily_rate
    )];
    parts.extend(segments.iter().map(|s| {
        format!(
            "{}: AED {} x {} days x {} years = AED {}",
            s.period,
            s.daily_rate,
            s.days_per_year.normalize(),
            s.years.normalize(),
            s.amount
        )
    }));
    parts.join("; ")
}
