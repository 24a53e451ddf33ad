//! Validation boundary for raw gratuity input.
//!
//! [`validate`] checks a [`RawGratuityInput`] for structural and business
//! validity without performing any calculation. Every problem is reported as
//! a field-scoped [`CalculatorError`]: blocking problems in `errors`,
//! non-blocking ones in `warnings`. Validation never fails and never panics.
//!
//! The checks, in the order they are reported:
//!
//! 1. `basic_salary` is present, numeric, positive, has at most 2 decimal
//!    places and is below the hard ceiling (plausibility bounds produce warnings)
//! 2. `start_date` and `end_date` are present ISO dates, the start is not in
//!    the future, the end is after the start, and the span is within the
//!    sanity bound
//! 3. `contract_type` and `termination_reason` are known values
//! 4. `free_zone` is a well-formed code (unlisted codes produce a warning)
//! 5. service under the qualifying minimum produces a warning

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::{
    CURRENCY_DECIMAL_PLACES, add_years, service_years_between, unknown_free_zone_warning,
};
use crate::config::{RuleSet, ValidationLimits};
use crate::models::{
    CalculatorError, ContractType, DATE_FORMAT, DEFAULT_FREE_ZONE, ErrorCode, GratuityInput,
    RawGratuityInput, TerminationReason, ValidationResult, normalize_code,
};

/// Longest free-zone code accepted.
pub const MAX_FREE_ZONE_LENGTH: usize = 32;

/// Validates raw input against the rule set's limits.
///
/// `as_of` is the reference date for the future-start check; it is passed in
/// so that validation is a pure function of its arguments.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gratuity_engine::config::RuleSet;
/// use gratuity_engine::models::{ErrorCode, RawGratuityInput};
/// use gratuity_engine::validation::validate;
///
/// let raw = RawGratuityInput {
///     contract_type: "unlimited".to_string(),
///     basic_salary: "-500".to_string(),
///     start_date: "2015-01-01".to_string(),
///     end_date: "2022-01-01".to_string(),
///     termination_reason: "termination".to_string(),
///     free_zone: None,
/// };
///
/// let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let result = validate(&raw, &RuleSet::uae(), as_of);
/// assert!(!result.is_valid);
/// assert_eq!(result.errors[0].code, ErrorCode::NegativeSalary);
/// ```
pub fn validate(raw: &RawGratuityInput, rules: &RuleSet, as_of: NaiveDate) -> ValidationResult {
    validate_and_parse(raw, rules, as_of).0
}

/// Validates raw input and, when it is valid, returns the typed input.
///
/// The typed input is `Some` exactly when the returned result has no errors.
pub(crate) fn validate_and_parse(
    raw: &RawGratuityInput,
    rules: &RuleSet,
    as_of: NaiveDate,
) -> (ValidationResult, Option<GratuityInput>) {
    let mut diagnostics = Diagnostics::default();
    let limits = &rules.limits;

    let basic_salary = diagnostics.record(
        required(&raw.basic_salary, "basic_salary").and_then(|text| parse_salary(text, limits)),
    );
    if let Some(warning) = basic_salary.and_then(|salary| salary_plausibility(salary, limits)) {
        diagnostics.warnings.push(warning);
    }

    let start_date = diagnostics.record(
        required(&raw.start_date, "start_date")
            .and_then(|text| parse_date(text, "start_date", ErrorCode::InvalidStartDate)),
    );
    let end_date = diagnostics.record(
        required(&raw.end_date, "end_date")
            .and_then(|text| parse_date(text, "end_date", ErrorCode::InvalidEndDate)),
    );

    if let Some(start) = start_date {
        if start > as_of {
            diagnostics.errors.push(
                CalculatorError::error(
                    ErrorCode::FutureStartDate,
                    "Start date cannot be in the future",
                )
                .with_field("start_date")
                .with_details(format!(
                    "{} is after {}",
                    start.format(DATE_FORMAT),
                    as_of.format(DATE_FORMAT)
                ))
                .with_suggestion("Enter the first day of employment"),
            );
        }
    }

    let period_is_valid = match (start_date, end_date) {
        (Some(start), Some(end)) => diagnostics.record(check_service_period(start, end, limits)),
        _ => None,
    }
    .is_some();

    let contract_type = diagnostics.record(
        required(&raw.contract_type, "contract_type").and_then(parse_contract_type),
    );
    let termination_reason = diagnostics.record(
        required(&raw.termination_reason, "termination_reason").and_then(parse_termination_reason),
    );

    let free_zone = diagnostics.record(parse_free_zone(raw.free_zone.as_deref()));
    if let Some(code) = &free_zone {
        if rules.jurisdictions.get(code).is_none() {
            diagnostics
                .warnings
                .push(unknown_free_zone_warning(code, &rules.jurisdictions));
        }
    }

    if let (true, Some(start), Some(end)) = (period_is_valid, start_date, end_date) {
        let years = service_years_between(start, end);
        if years < rules.accrual.minimum_service_years {
            diagnostics.warnings.push(
                CalculatorError::warning(
                    ErrorCode::ServiceUnderMinimum,
                    format!(
                        "Service of {} years is below the {} year minimum; no gratuity is payable",
                        years.round_dp(4),
                        rules.accrual.minimum_service_years.normalize()
                    ),
                )
                .with_field("end_date")
                .with_details(rules.accrual.minimum_service_clause.clone()),
            );
        }
    }

    let input = match (
        diagnostics.errors.is_empty(),
        contract_type,
        basic_salary,
        start_date,
        end_date,
        termination_reason,
        free_zone,
    ) {
        (
            true,
            Some(contract_type),
            Some(basic_salary),
            Some(start_date),
            Some(end_date),
            Some(termination_reason),
            Some(free_zone),
        ) => Some(GratuityInput {
            contract_type,
            basic_salary,
            start_date,
            end_date,
            termination_reason,
            free_zone,
        }),
        _ => None,
    };

    (
        ValidationResult::from_parts(diagnostics.errors, diagnostics.warnings),
        input,
    )
}

/// Errors and warnings collected during one validation pass.
#[derive(Default)]
struct Diagnostics {
    errors: Vec<CalculatorError>,
    warnings: Vec<CalculatorError>,
}

impl Diagnostics {
    /// Keeps the value of a successful check, recording the error otherwise.
    fn record<T>(&mut self, result: Result<T, CalculatorError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, CalculatorError> {
    let value = value.trim();
    if value.is_empty() {
        Err(
            CalculatorError::error(ErrorCode::MissingField, format!("{} is required", field))
                .with_field(field),
        )
    } else {
        Ok(value)
    }
}

fn parse_salary(text: &str, limits: &ValidationLimits) -> Result<Decimal, CalculatorError> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let salary = Decimal::from_str(cleaned.trim()).map_err(|_| {
        CalculatorError::error(ErrorCode::InvalidSalary, "Basic salary must be a number")
            .with_field("basic_salary")
            .with_details(format!("'{}' is not a decimal amount", text))
            .with_suggestion("Enter the monthly basic salary, for example 10000 or 12,500.50")
    })?;

    if salary < Decimal::ZERO {
        return Err(CalculatorError::error(
            ErrorCode::NegativeSalary,
            "Basic salary cannot be negative",
        )
        .with_field("basic_salary")
        .with_details(format!("Received {}", salary))
        .with_suggestion("Enter the monthly basic salary as a positive amount"));
    }
    if salary.is_zero() {
        return Err(CalculatorError::error(
            ErrorCode::ZeroSalary,
            "Basic salary must be greater than zero",
        )
        .with_field("basic_salary")
        .with_suggestion("Enter the monthly basic salary excluding allowances"));
    }
    if salary.normalize().scale() > CURRENCY_DECIMAL_PLACES {
        return Err(CalculatorError::error(
            ErrorCode::InvalidSalary,
            "Basic salary cannot have fractions smaller than a fils",
        )
        .with_field("basic_salary")
        .with_details(format!(
            "Received {}; at most {} decimal places are allowed",
            salary, CURRENCY_DECIMAL_PLACES
        ))
        .with_suggestion("Round the salary to whole fils, for example 12,500.50"));
    }
    if salary > limits.max_salary {
        return Err(CalculatorError::error(
            ErrorCode::SalaryOutOfRange,
            format!("Basic salary cannot exceed {}", limits.max_salary),
        )
        .with_field("basic_salary")
        .with_details(format!("Received {}", salary))
        .with_suggestion("Check that the salary is a monthly figure"));
    }

    Ok(salary)
}

fn salary_plausibility(salary: Decimal, limits: &ValidationLimits) -> Option<CalculatorError> {
    if salary < limits.min_plausible_salary {
        Some(
            CalculatorError::warning(
                ErrorCode::SalaryUnusuallyLow,
                format!(
                    "Basic salary is below {}; check that it is a monthly figure",
                    limits.min_plausible_salary
                ),
            )
            .with_field("basic_salary")
            .with_details(format!("Received {}", salary)),
        )
    } else if salary > limits.max_plausible_salary {
        Some(
            CalculatorError::warning(
                ErrorCode::SalaryUnusuallyHigh,
                format!(
                    "Basic salary is above {}; check that it excludes allowances",
                    limits.max_plausible_salary
                ),
            )
            .with_field("basic_salary")
            .with_details(format!("Received {}", salary)),
        )
    } else {
        None
    }
}

fn parse_date(text: &str, field: &str, code: ErrorCode) -> Result<NaiveDate, CalculatorError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
        CalculatorError::error(code, format!("{} is not a valid date", field))
            .with_field(field)
            .with_details(format!("'{}' is not a calendar date in YYYY-MM-DD form", text))
            .with_suggestion("Use the format YYYY-MM-DD, for example 2022-01-31")
    })
}

fn check_service_period(
    start: NaiveDate,
    end: NaiveDate,
    limits: &ValidationLimits,
) -> Result<(), CalculatorError> {
    if end <= start {
        return Err(CalculatorError::error(
            ErrorCode::EndDateBeforeStartDate,
            "End date must be after start date",
        )
        .with_field("end_date")
        .with_details(format!(
            "{} is not after {}",
            end.format(DATE_FORMAT),
            start.format(DATE_FORMAT)
        ))
        .with_suggestion("Enter the last day of employment"));
    }

    if let Some(limit) = add_years(start, limits.max_service_years) {
        if end > limit {
            return Err(CalculatorError::error(
                ErrorCode::ServicePeriodTooLong,
                format!(
                    "Service period cannot exceed {} years",
                    limits.max_service_years
                ),
            )
            .with_field("end_date")
            .with_details(format!(
                "{} is after {}",
                end.format(DATE_FORMAT),
                limit.format(DATE_FORMAT)
            ))
            .with_suggestion("Check the start and end dates"));
        }
    }

    Ok(())
}

fn parse_contract_type(text: &str) -> Result<ContractType, CalculatorError> {
    text.parse::<ContractType>().map_err(|err| {
        CalculatorError::error(ErrorCode::InvalidContractType, err.to_string())
            .with_field("contract_type")
            .with_details(format!("Accepted values: {}", join_codes(&ContractType::ALL)))
    })
}

fn parse_termination_reason(text: &str) -> Result<TerminationReason, CalculatorError> {
    text.parse::<TerminationReason>().map_err(|err| {
        CalculatorError::error(ErrorCode::InvalidTerminationReason, err.to_string())
            .with_field("termination_reason")
            .with_details(format!(
                "Accepted values: {}",
                join_codes(&TerminationReason::ALL)
            ))
    })
}

fn join_codes<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalises a free-zone code, defaulting absent or blank values to mainland.
fn parse_free_zone(value: Option<&str>) -> Result<String, CalculatorError> {
    let Some(text) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(DEFAULT_FREE_ZONE.to_string());
    };

    let code = normalize_code(text);
    let well_formed = code.len() <= MAX_FREE_ZONE_LENGTH
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if well_formed {
        Ok(code)
    } else {
        Err(
            CalculatorError::error(ErrorCode::InvalidFreeZone, "Free zone code is not valid")
                .with_field("free_zone")
                .with_details(format!(
                    "'{}' must be at most {} letters, digits or underscores",
                    text, MAX_FREE_ZONE_LENGTH
                ))
                .with_suggestion("Use a code such as 'difc' or 'jafza', or omit it for mainland"),
        )
    }
}
