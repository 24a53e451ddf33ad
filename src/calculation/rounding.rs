//! The single rounding rule used for every monetary and year figure.
//!
//! All rounding is half-up (midpoint away from zero) on `Decimal`, so output
//! is identical on every platform.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for monetary amounts.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Decimal places kept for fractional service years.
pub const YEARS_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary amount half-up to 2 decimal places.
///
/// ```
/// use gratuity_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("4666.155").unwrap()), Decimal::from_str("4666.16").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds fractional service years half-up to 2 decimal places.
pub fn round_years(years: Decimal) -> Decimal {
    years.round_dp_with_strategy(YEARS_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
