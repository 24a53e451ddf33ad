//! Service duration calculation.
//!
//! Two representations of the same service period are produced and both are
//! kept on the result:
//!
//! - a calendar breakdown (years, months, days) for display, computed by
//!   field-wise subtraction with month-length-aware borrowing;
//! - fractional years (`total_days / 365.25`). The exact quotient decides
//!   eligibility and the resignation band; the 2 dp figure sizes accrual
//!   segments.
//!
//! The two can differ by a day or so across leap years.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, DATE_FORMAT};

use super::rounding::round_years;

/// Average length of a year in days, used for fractional service years.
pub const DAYS_PER_AVERAGE_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// A service period in both calendar and fractional form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDuration {
    /// Whole calendar years.
    pub years: u32,
    /// Whole months after `years`.
    pub months: u32,
    /// Days after `months`.
    pub days: u32,
    /// Exact number of days between the two dates.
    pub total_days: i64,
    /// `total_days / 365.25`, unrounded.
    pub total_years: Decimal,
}

impl ServiceDuration {
    /// Returns the fractional years used to size accrual segments, rounded to
    /// 2 decimal places. Threshold checks compare `total_years` instead.
    pub fn accrual_years(&self) -> Decimal {
        round_years(self.total_years)
    }

    /// Builds the audit step recording this duration.
    pub fn audit_step(&self, start: NaiveDate, end: NaiveDate, step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "service_duration".to_string(),
            rule_name: "Service Duration".to_string(),
            clause_ref: "Calendar breakdown; 365.25-day average year".to_string(),
            input: serde_json::json!({
                "start_date": start.format(DATE_FORMAT).to_string(),
                "end_date": end.format(DATE_FORMAT).to_string()
            }),
            output: serde_json::json!({
                "years": self.years,
                "months": self.months,
                "days": self.days,
                "total_days": self.total_days,
                "accrual_years": self.accrual_years().to_string()
            }),
            reasoning: format!(
                "{} years, {} months, {} days; {} days / 365.25 = {} years",
                self.years,
                self.months,
                self.days,
                self.total_days,
                self.accrual_years()
            ),
        }
    }
}

/// Calculates the service duration between two dates.
///
/// The caller is responsible for ensuring `end >= start`; an inverted range
/// yields a zero calendar breakdown and negative fractional years.
///
/// # Examples
///
/// ```
/// use gratuity_engine::calculation::calculate_duration;
/// use chrono::NaiveDate;
///
/// let duration = calculate_duration(
///     NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
///     NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
/// );
/// assert_eq!((duration.years, duration.months, duration.days), (0, 0, 30));
/// assert_eq!(duration.total_days, 30);
/// ```
pub fn calculate_duration(start: NaiveDate, end: NaiveDate) -> ServiceDuration {
    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    let mut days = end.day() as i32 - start.day() as i32;

    // Borrow from the month preceding `end`, stepping further back while the
    // borrowed month is too short to cover the deficit (e.g. 31 Jan -> 1 Mar).
    let (mut borrow_year, mut borrow_month) = (end.year(), end.month());
    while days < 0 {
        (borrow_year, borrow_month) = if borrow_month == 1 {
            (borrow_year - 1, 12)
        } else {
            (borrow_year, borrow_month - 1)
        };
        months -= 1;
        days += days_in_month(borrow_year, borrow_month) as i32;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    let total_days = (end - start).num_days();
    let total_years = Decimal::from(total_days) / DAYS_PER_AVERAGE_YEAR;

    ServiceDuration {
        years: u32::try_from(years).unwrap_or(0),
        months: u32::try_from(months).unwrap_or(0),
        days: u32::try_from(days).unwrap_or(0),
        total_days,
        total_years,
    }
}

/// Returns the unrounded fractional service years between two dates.
/// This is the figure the minimum-service threshold is checked against.
pub fn service_years_between(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days()) / DAYS_PER_AVERAGE_YEAR
}

/// Adds whole calendar years to a date, preserving month and day.
///
/// A 29 February that does not exist in the target year spills over to
/// 1 March. Returns `None` if the resulting year is out of range.
///
/// ```
/// use gratuity_engine::calculation::add_years;
/// use chrono::NaiveDate;
///
/// let leap_day = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
/// assert_eq!(add_years(leap_day, 1), NaiveDate::from_ymd_opt(2021, 3, 1));
/// assert_eq!(add_years(leap_day, 4), NaiveDate::from_ymd_opt(2024, 2, 29));
/// ```
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let years = i32::try_from(years).ok()?;
    let year = date.year().checked_add(years)?;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Returns the number of days in a month (handles leap years).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
