//! The gratuity calculation engine.
//!
//! [`GratuityEngine`] owns an immutable [`RuleSet`] and runs the full
//! pipeline over it:
//!
//! ```text
//! validate -> duration -> jurisdiction -> accrual -> resignation -> cap -> round
//! ```
//!
//! [`GratuityEngine::compute_safe`] is the entry point for untyped input. It
//! never returns an `Err` and never panics: validation failures come back as
//! the first blocking [`CalculatorError`], and internal faults as a
//! `CALCULATION_FAILED` diagnostic.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculation::{
    accrue, add_years, apply_cap, apply_resignation_scaling, calculate_duration, daily_rate,
    round_currency, select_regime,
};
use crate::config::{ConfigLoader, JurisdictionRule, RuleSet};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CalculationOutcome, CalculatorError, ErrorCode, GratuityInput, GratuityResult,
    RawGratuityInput, ValidationResult, normalize_code,
};
use crate::validation::validate_and_parse;

/// The output of the typed calculation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    /// The assembled result.
    pub result: GratuityResult,
    /// Non-blocking warnings raised while calculating.
    pub warnings: Vec<CalculatorError>,
}

/// Computes gratuity from an immutable rule set.
///
/// The engine is `Send + Sync` and holds no mutable state; one instance can
/// serve any number of concurrent callers.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use gratuity_engine::engine::GratuityEngine;
/// use gratuity_engine::models::RawGratuityInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let engine = GratuityEngine::default();
/// let raw = RawGratuityInput {
///     contract_type: "unlimited".to_string(),
///     basic_salary: "10000".to_string(),
///     start_date: "2015-01-01".to_string(),
///     end_date: "2022-01-01".to_string(),
///     termination_reason: "termination".to_string(),
///     free_zone: Some("mainland".to_string()),
/// };
///
/// let outcome = engine.compute_safe(&raw, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert!(outcome.success);
/// assert_eq!(outcome.data.unwrap().total_gratuity, Decimal::from_str("54999.45").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct GratuityEngine {
    rules: RuleSet,
}

impl GratuityEngine {
    /// Creates an engine over a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleSet`] if the tables are inconsistent.
    pub fn new(rules: RuleSet) -> EngineResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Creates an engine from a directory of YAML rule tables.
    pub fn from_config_dir<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Self::new(ConfigLoader::load(path)?.into_rules())
    }

    /// Returns the rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Looks up a jurisdiction rule by code, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::JurisdictionNotFound`] for an unlisted code.
    pub fn jurisdiction(&self, code: &str) -> EngineResult<&JurisdictionRule> {
        self.rules
            .jurisdictions
            .get(&normalize_code(code))
            .ok_or_else(|| EngineError::JurisdictionNotFound {
                code: code.to_string(),
            })
    }

    /// Validates raw input without calculating.
    pub fn validate(&self, raw: &RawGratuityInput, as_of: NaiveDate) -> ValidationResult {
        validate_and_parse(raw, &self.rules, as_of).0
    }

    /// Validates and calculates, converting every failure into a diagnostic.
    ///
    /// `as_of` is the reference date for the future-start check.
    pub fn compute_safe(
        &self,
        raw: &RawGratuityInput,
        as_of: NaiveDate,
    ) -> CalculationOutcome<GratuityResult> {
        let (validation, input) = validate_and_parse(raw, &self.rules, as_of);
        let Some(input) = input else {
            return rejected(validation);
        };

        match self.calculate(&input) {
            Ok(calculation) => {
                debug!(
                    total_gratuity = %calculation.result.total_gratuity,
                    warnings = validation.warnings.len() + calculation.warnings.len(),
                    "Gratuity calculated"
                );
                CalculationOutcome::success(
                    calculation.result,
                    merge_warnings(validation.warnings, calculation.warnings),
                )
            }
            Err(err) => {
                warn!(error = %err, "Gratuity calculation failed");
                CalculationOutcome::failure(calculation_failed(&err), validation.warnings)
            }
        }
    }

    /// Recalculates as if service continued for `additional_years` more
    /// calendar years.
    ///
    /// The base input is validated first and its failure returned unchanged.
    /// The projection is computed from scratch from a new input; `raw` is not
    /// modified.
    pub fn project(
        &self,
        raw: &RawGratuityInput,
        additional_years: u32,
        as_of: NaiveDate,
    ) -> CalculationOutcome<GratuityResult> {
        let (validation, input) = validate_and_parse(raw, &self.rules, as_of);
        let Some(input) = input else {
            return rejected(validation);
        };

        let Some(end_date) = add_years(input.end_date, additional_years) else {
            let err = EngineError::CalculationError {
                message: format!(
                    "projected end date {} years after {} is out of range",
                    additional_years, input.end_date
                ),
            };
            warn!(error = %err, "Projection failed");
            return CalculationOutcome::failure(calculation_failed(&err), validation.warnings);
        };

        debug!(
            additional_years,
            end_date = %end_date,
            "Projecting gratuity to extended end date"
        );
        self.compute_safe(&RawGratuityInput::from(&input.with_end_date(end_date)), as_of)
    }

    /// Runs the calculation pipeline over validated input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CalculationError`] on decimal overflow.
    pub fn calculate(&self, input: &GratuityInput) -> EngineResult<Calculation> {
        let rules = &self.rules;
        let mut audit_steps: Vec<AuditStep> = Vec::new();
        let mut step_number: u32 = 1;

        let duration = calculate_duration(input.start_date, input.end_date);
        // Thresholds compare the exact years; segments are sized on the rounded figure
        let service_years = duration.total_years;
        let total_years = duration.accrual_years();
        audit_steps.push(duration.audit_step(input.start_date, input.end_date, step_number));
        step_number += 1;
        debug!(
            total_days = duration.total_days,
            total_years = %total_years,
            "Service duration calculated"
        );

        let selection = select_regime(&rules.jurisdictions, &input.free_zone, step_number);
        audit_steps.push(selection.audit_step);
        step_number += 1;
        debug!(
            jurisdiction = %selection.jurisdiction,
            regime = %selection.regime,
            "Jurisdiction rules selected"
        );

        let mut legal_references = selection.legal_references;
        let minimum = rules.accrual.minimum_service_years;

        let (rate, breakdown, unscaled, reason) = if service_years >= minimum {
            let accrual = accrue(
                &rules.accrual,
                selection.regime,
                total_years,
                input.basic_salary,
                step_number,
            )?;
            audit_steps.push(accrual.audit_step);
            (
                accrual.daily_rate,
                accrual.segments,
                accrual.unscaled_total,
                None,
            )
        } else {
            let reason = format!(
                "Service of {} years is below the {} year minimum; no gratuity is payable",
                service_years.round_dp(4),
                minimum.normalize()
            );
            audit_steps.push(AuditStep {
                step_number,
                rule_id: "minimum_service".to_string(),
                rule_name: "Minimum Qualifying Service".to_string(),
                clause_ref: rules.accrual.minimum_service_clause.clone(),
                input: serde_json::json!({
                    "total_years": service_years.round_dp(4).to_string(),
                    "minimum_years": minimum.to_string()
                }),
                output: serde_json::json!({
                    "eligible": false,
                    "amount": "0"
                }),
                reasoning: reason.clone(),
            });
            legal_references.push(rules.accrual.minimum_service_clause.clone());
            (
                daily_rate(input.basic_salary, rules.accrual.days_per_month)?,
                Vec::new(),
                Decimal::ZERO,
                Some(reason),
            )
        };
        step_number += 1;

        let scaling = apply_resignation_scaling(
            &rules.resignation,
            unscaled,
            input.contract_type,
            input.termination_reason,
            service_years,
            step_number,
        )?;
        audit_steps.push(scaling.audit_step);
        step_number += 1;
        if scaling.applied {
            legal_references.push(rules.resignation.clause.clone());
        }

        let cap = apply_cap(&rules.cap, scaling.amount, input.basic_salary, step_number)?;
        audit_steps.push(cap.audit_step);
        if cap.exceeded {
            legal_references.push(rules.cap.clause.clone());
        }

        let result = GratuityResult {
            total_gratuity: round_currency(cap.amount),
            years_of_service: duration.years,
            months_of_service: duration.months,
            days_of_service: duration.days,
            total_days: duration.total_days,
            total_years,
            breakdown,
            daily_rate: rate,
            unscaled_gratuity: unscaled,
            max_gratuity: cap.max_gratuity,
            max_gratuity_exceeded: cap.exceeded,
            entitlement_percentage: scaling.entitlement_percentage,
            regime: selection.regime,
            jurisdiction: selection.jurisdiction,
            legal_references,
            reason,
            audit_steps,
        };

        Ok(Calculation {
            result,
            warnings: selection.warnings,
        })
    }
}

impl Default for GratuityEngine {
    fn default() -> Self {
        Self {
            rules: RuleSet::uae(),
        }
    }
}

/// Builds the failed outcome for input that did not pass validation.
fn rejected(validation: ValidationResult) -> CalculationOutcome<GratuityResult> {
    let ValidationResult {
        errors, warnings, ..
    } = validation;
    let error = errors.into_iter().next().unwrap_or_else(|| {
        CalculatorError::error(ErrorCode::CalculationFailed, "Input could not be validated")
    });
    warn!(code = ?error.code, field = ?error.field, "Gratuity input rejected");
    CalculationOutcome::failure(error, warnings)
}

fn calculation_failed(err: &EngineError) -> CalculatorError {
    CalculatorError::error(
        ErrorCode::CalculationFailed,
        "The gratuity could not be calculated",
    )
    .with_details(err.to_string())
    .with_suggestion("Check the input values and try again")
}

/// Appends `extra` to `warnings`, skipping any with the same code and field.
fn merge_warnings(
    mut warnings: Vec<CalculatorError>,
    extra: Vec<CalculatorError>,
) -> Vec<CalculatorError> {
    for warning in extra {
        let duplicate = warnings
            .iter()
            .any(|w| w.code == warning.code && w.field == warning.field);
        if !duplicate {
            warnings.push(warning);
        }
    }
    warnings
}
