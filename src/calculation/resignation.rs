//! Resignation entitlement scaling.
//!
//! An employee on an unlimited contract who resigns receives only part of the
//! accrued gratuity, depending on length of service:
//!
//! | Service (years) | Entitlement |
//! |-----------------|-------------|
//! | `< 1`           | 0%          |
//! | `[1, 3)`        | 33.33%      |
//! | `[3, 5)`        | 66.67%      |
//! | `≥ 5`           | 100%        |
//!
//! Every other contract type and termination reason is paid in full.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ResignationRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ContractType, TerminationReason};

use super::rounding::round_currency;

/// The result of resignation scaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResignationScalingResult {
    /// The payable amount after scaling.
    pub amount: Decimal,
    /// The fraction of the accrued amount that is payable.
    pub entitlement_percentage: Decimal,
    /// True when the resignation tiers were consulted.
    pub applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns true if the resignation reduction applies to this contract.
pub fn resignation_applies(contract_type: ContractType, reason: TerminationReason) -> bool {
    contract_type == ContractType::Unlimited && reason == TerminationReason::Resignation
}

/// Scales an accrued amount by the resignation entitlement percentage.
///
/// # Arguments
///
/// * `rules` - The resignation tier table
/// * `amount` - The unscaled accrued gratuity
/// * `contract_type` - The employee's contract type
/// * `reason` - Why employment ended
/// * `total_years` - Exact fractional service years; the bands are not
///   applied to a rounded figure
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] on decimal overflow.
///
/// # Examples
///
/// ```
/// use gratuity_engine::calculation::apply_resignation_scaling;
/// use gratuity_engine::config::RuleSet;
/// use gratuity_engine::models::{ContractType, TerminationReason};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rules = RuleSet::uae();
/// let result = apply_resignation_scaling(
///     &rules.resignation,
///     Decimal::from(30000),
///     ContractType::Unlimited,
///     TerminationReason::Resignation,
///     Decimal::from_str("3.00").unwrap(),
///     4,
/// ).unwrap();
///
/// assert_eq!(result.entitlement_percentage, Decimal::from_str("0.6667").unwrap());
/// assert_eq!(result.amount, Decimal::from(20001));
/// ```
pub fn apply_resignation_scaling(
    rules: &ResignationRules,
    amount: Decimal,
    contract_type: ContractType,
    reason: TerminationReason,
    total_years: Decimal,
    step_number: u32,
) -> EngineResult<ResignationScalingResult> {
    let applied = resignation_applies(contract_type, reason);

    let entitlement_percentage = if applied {
        rules.percentage_for(total_years)
    } else {
        Decimal::ONE
    };

    let scaled = amount
        .checked_mul(entitlement_percentage)
        .map(round_currency)
        .ok_or_else(|| EngineError::overflow("resignation entitlement"))?;

    let reasoning = if applied {
        format!(
            "Unlimited contract ended by resignation after {} years: {}% of AED {} = AED {}",
            total_years.round_dp(4).normalize(),
            (entitlement_percentage * Decimal::ONE_HUNDRED).normalize(),
            amount,
            scaled
        )
    } else {
        format!(
            "{} contract ended by {}: full entitlement applies",
            contract_type, reason
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "resignation_scaling".to_string(),
        rule_name: "Resignation Entitlement".to_string(),
        clause_ref: rules.clause.clone(),
        input: serde_json::json!({
            "amount": amount.to_string(),
            "contract_type": contract_type.as_str(),
            "termination_reason": reason.as_str(),
            "total_years": total_years.to_string()
        }),
        output: serde_json::json!({
            "applied": applied,
            "entitlement_percentage": entitlement_percentage.to_string(),
            "amount": scaled.to_string()
        }),
        reasoning,
    };

    Ok(ResignationScalingResult {
        amount: scaled,
        entitlement_percentage,
        applied,
        audit_step,
    })
}
