//! Property-based tests for gratuity calculation invariants.
//!
//! These tests use proptest to check properties that must hold for every
//! valid input (bounds, determinism, tier structure) and for arbitrary
//! malformed input (the safe wrapper always answers).

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use gratuity_engine::calculation::add_years;
use gratuity_engine::engine::GratuityEngine;
use gratuity_engine::models::{ErrorCode, RawGratuityInput, Regime};

// PROPERTY TEST STRATEGIES

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// Strategy to generate monthly salaries between 1,000.00 and 200,000.00
fn salary_strategy() -> impl Strategy<Value = Decimal> {
    (100_000i64..=20_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a start date and a service length in days (1 day to ~45 years)
fn period_strategy() -> impl Strategy<Value = (NaiveDate, i64)> {
    (0i64..=12_000, 1i64..=16_000).prop_map(|(offset, length)| {
        let start = NaiveDate::from_ymd_opt(1975, 1, 1).unwrap() + Duration::days(offset);
        (start, length)
    })
}

fn contract_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("unlimited"), Just("limited")]
}

fn reason_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("resignation"),
        Just("termination"),
        Just("contract_end"),
        Just("mutual_agreement"),
    ]
}

fn free_zone_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("mainland"),
        Just("difc"),
        Just("adgm"),
        Just("dmcc"),
        Just("jafza"),
    ]
}

fn build_input(
    salary: Decimal,
    start: NaiveDate,
    length: i64,
    contract: &str,
    reason: &str,
    free_zone: &str,
) -> RawGratuityInput {
    RawGratuityInput {
        contract_type: contract.to_string(),
        basic_salary: salary.to_string(),
        start_date: start.to_string(),
        end_date: (start + Duration::days(length)).to_string(),
        termination_reason: reason.to_string(),
        free_zone: Some(free_zone.to_string()),
    }
}

/// Returns true when the span is within the 50-year validation bound.
fn within_limit(start: NaiveDate, length: i64) -> bool {
    add_years(start, 50).is_some_and(|limit| start + Duration::days(length) <= limit)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_total_is_between_zero_and_cap(
        salary in salary_strategy(),
        (start, length) in period_strategy(),
        contract in contract_strategy(),
        reason in reason_strategy(),
        free_zone in free_zone_strategy(),
    ) {
        prop_assume!(within_limit(start, length));
        let engine = GratuityEngine::default();
        let input = build_input(salary, start, length, contract, reason, free_zone);

        let outcome = engine.compute_safe(&input, as_of());
        prop_assert!(outcome.success, "unexpected failure: {:?}", outcome.error);
        let result = outcome.data.unwrap();

        prop_assert!(result.total_gratuity >= Decimal::ZERO);
        prop_assert!(result.total_gratuity <= salary * Decimal::from(24));
        prop_assert_eq!(result.breakdown_total(), result.unscaled_gratuity);
        prop_assert!(result.entitlement_percentage >= Decimal::ZERO);
        prop_assert!(result.entitlement_percentage <= Decimal::ONE);
        if result.entitlement_percentage < Decimal::ONE {
            prop_assert_eq!(contract, "unlimited");
            prop_assert_eq!(reason, "resignation");
        }
    }

    #[test]
    fn prop_under_one_year_is_zero(
        salary in salary_strategy(),
        start_offset in 0i64..=12_000,
        length in 1i64..=365,
        contract in contract_strategy(),
        reason in reason_strategy(),
    ) {
        let start = NaiveDate::from_ymd_opt(1975, 1, 1).unwrap() + Duration::days(start_offset);
        let input = build_input(salary, start, length, contract, reason, "mainland");

        let outcome = GratuityEngine::default().compute_safe(&input, as_of());
        prop_assert!(outcome.success);
        prop_assert!(outcome.warnings.iter().any(|w| w.code == ErrorCode::ServiceUnderMinimum));
        let result = outcome.data.unwrap();
        prop_assert_eq!(result.total_gratuity, Decimal::ZERO);
        prop_assert!(result.breakdown.is_empty());
    }

    #[test]
    fn prop_flat_rate_never_breaks_at_five_years(
        salary in salary_strategy(),
        (start, length) in period_strategy(),
        free_zone in prop_oneof![Just("difc"), Just("adgm")],
    ) {
        prop_assume!(within_limit(start, length));
        let input = build_input(salary, start, length, "limited", "termination", free_zone);

        let result = GratuityEngine::default().compute_safe(&input, as_of()).data.unwrap();
        prop_assert_eq!(result.regime, Regime::FlatRate);
        prop_assert!(result.breakdown.len() <= 1);
        for segment in &result.breakdown {
            prop_assert_eq!(segment.days_per_year, Decimal::from(21));
        }
    }

    #[test]
    fn prop_mainland_over_five_years_has_two_segments(
        salary in salary_strategy(),
        start_offset in 0i64..=12_000,
        length in 1_830i64..=16_000,
    ) {
        let start = NaiveDate::from_ymd_opt(1975, 1, 1).unwrap() + Duration::days(start_offset);
        prop_assume!(within_limit(start, length));
        let input = build_input(salary, start, length, "unlimited", "termination", "mainland");

        let result = GratuityEngine::default().compute_safe(&input, as_of()).data.unwrap();
        prop_assert!(result.total_years > Decimal::from(5));
        prop_assert_eq!(result.breakdown.len(), 2);
        prop_assert_eq!(result.breakdown[0].days_per_year, Decimal::from(21));
        prop_assert_eq!(result.breakdown[1].days_per_year, Decimal::from(30));
    }

    #[test]
    fn prop_compute_safe_is_deterministic(
        salary in salary_strategy(),
        (start, length) in period_strategy(),
        contract in contract_strategy(),
        reason in reason_strategy(),
        free_zone in free_zone_strategy(),
    ) {
        let engine = GratuityEngine::default();
        let input = build_input(salary, start, length, contract, reason, free_zone);

        let first = engine.compute_safe(&input, as_of());
        let second = engine.compute_safe(&input, as_of());
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(
        contract in ".{0,20}",
        salary in ".{0,20}",
        start in ".{0,20}",
        end in ".{0,20}",
        reason in ".{0,20}",
        free_zone in proptest::option::of(".{0,40}"),
    ) {
        let input = RawGratuityInput {
            contract_type: contract,
            basic_salary: salary,
            start_date: start,
            end_date: end,
            termination_reason: reason,
            free_zone,
        };

        let outcome = GratuityEngine::default().compute_safe(&input, as_of());
        prop_assert_eq!(outcome.success, outcome.data.is_some());
        prop_assert_eq!(outcome.success, outcome.error.is_none());
    }

    #[test]
    fn prop_projection_never_decreases_gratuity(
        salary in salary_strategy(),
        start_offset in 0i64..=12_000,
        length in 1i64..=5_000,
        additional_years in 0u32..=10,
        contract in contract_strategy(),
        reason in reason_strategy(),
    ) {
        let start = NaiveDate::from_ymd_opt(1975, 1, 1).unwrap() + Duration::days(start_offset);
        let engine = GratuityEngine::default();
        let input = build_input(salary, start, length, contract, reason, "mainland");

        let base = engine.compute_safe(&input, as_of()).data.unwrap();
        let projected = engine.project(&input, additional_years, as_of());
        prop_assert!(projected.success);
        prop_assert!(projected.data.unwrap().total_gratuity >= base.total_gratuity);
    }
}
