//! Statutory cap enforcement.
//!
//! Total gratuity may not exceed two years' basic salary
//! (`basic_salary × 24`). Amounts above the cap are clamped and flagged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CapRules;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The result of cap enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapResult {
    /// The amount after clamping.
    pub amount: Decimal,
    /// The ceiling for this salary.
    pub max_gratuity: Decimal,
    /// True when the input amount was above the ceiling.
    pub exceeded: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Clamps an amount to the statutory ceiling.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] on decimal overflow.
///
/// # Examples
///
/// ```
/// use gratuity_engine::calculation::apply_cap;
/// use gratuity_engine::config::RuleSet;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::uae();
/// let result = apply_cap(&rules.cap, Decimal::from(142_000), Decimal::from(5000), 5).unwrap();
///
/// assert_eq!(result.amount, Decimal::from(120_000));
/// assert!(result.exceeded);
/// ```
pub fn apply_cap(
    rules: &CapRules,
    amount: Decimal,
    basic_salary: Decimal,
    step_number: u32,
) -> EngineResult<CapResult> {
    let max_gratuity = basic_salary
        .checked_mul(rules.months_of_salary)
        .ok_or_else(|| EngineError::overflow("maximum gratuity"))?;

    let exceeded = amount > max_gratuity;
    let capped = if exceeded { max_gratuity } else { amount };

    let reasoning = if exceeded {
        format!(
            "AED {} exceeds {} months of salary (AED {}); clamped to AED {}",
            amount,
            rules.months_of_salary.normalize(),
            max_gratuity,
            capped
        )
    } else {
        format!(
            "AED {} is within {} months of salary (AED {})",
            amount,
            rules.months_of_salary.normalize(),
            max_gratuity
        )
    };

    Ok(CapResult {
        amount: capped,
        max_gratuity,
        exceeded,
        audit_step: AuditStep {
            step_number,
            rule_id: "gratuity_cap".to_string(),
            rule_name: "Maximum Gratuity".to_string(),
            clause_ref: rules.clause.clone(),
            input: serde_json::json!({
                "amount": amount.to_string(),
                "basic_salary": basic_salary.to_string()
            }),
            output: serde_json::json!({
                "max_gratuity": max_gratuity.to_string(),
                "exceeded": exceeded,
                "amount": capped.to_string()
            }),
            reasoning,
        },
    })
}
