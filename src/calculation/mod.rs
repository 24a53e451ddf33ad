//! Calculation logic for the Gratuity Engine.
//!
//! This module contains the pure calculation stages of the gratuity pipeline:
//! service duration, jurisdiction rule selection, accrual by tier,
//! resignation entitlement scaling, and statutory cap enforcement. Each stage
//! takes typed input and immutable rule tables and returns its result together
//! with an audit step.

mod accrual;
mod cap;
mod duration;
mod jurisdiction;
mod resignation;
mod rounding;

pub use accrual::{AccrualResult, accrue, daily_rate};
pub use cap::{CapResult, apply_cap};
pub use duration::{
    DAYS_PER_AVERAGE_YEAR, ServiceDuration, add_years, calculate_duration, days_in_month,
    service_years_between,
};
pub use jurisdiction::{RegimeSelection, select_regime, unknown_free_zone_warning};
pub use resignation::{ResignationScalingResult, apply_resignation_scaling, resignation_applies};
pub use rounding::{CURRENCY_DECIMAL_PLACES, YEARS_DECIMAL_PLACES, round_currency, round_years};
