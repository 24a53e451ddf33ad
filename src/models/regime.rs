//! Accrual regimes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The accrual regime a jurisdiction follows.
///
/// `Mainland` applies the UAE federal tiers (21 days per year for the first
/// five years, 30 days thereafter). `FlatRate` applies a single 21-day rate
/// across the whole service period, as in DIFC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Tiered federal rules.
    Mainland,
    /// Flat-rate free-zone rules.
    FlatRate,
}

impl Regime {
    /// Returns the wire code for this regime.
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Mainland => "mainland",
            Regime::FlatRate => "flat_rate",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
