//! Rule-table types for gratuity calculation.
//!
//! This module contains the strongly-typed, immutable rule tables the engine
//! is built from: accrual tiers, resignation entitlement tiers, the statutory
//! cap, validation limits and the jurisdiction-to-regime mapping. They are
//! deserialized from YAML by [`ConfigLoader`](super::ConfigLoader) or built in
//! code by [`RuleSet::uae`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DEFAULT_FREE_ZONE, Regime};

/// Metadata identifying a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetMetadata {
    /// Short identifier (e.g., "uae-eosb").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Version or effective date of the rules.
    pub version: String,
    /// URL to the governing legislation.
    pub source_url: String,
}

/// One accrual tier: a day-count-per-year applied up to a service bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualTier {
    /// Label shown on the breakdown segment.
    pub label: String,
    /// Upper service bound in years; `None` for the open-ended final tier.
    #[serde(default)]
    pub up_to_years: Option<Decimal>,
    /// Days of wage accrued per year inside this tier.
    pub days_per_year: Decimal,
}

/// Accrual rules shared by every regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRules {
    /// Reference to the provision defining the daily wage and tiers.
    pub clause: String,
    /// Divisor turning a monthly salary into a daily wage.
    pub days_per_month: Decimal,
    /// Service below this many years accrues nothing.
    pub minimum_service_years: Decimal,
    /// Reference to the provision setting the qualifying minimum.
    pub minimum_service_clause: String,
    /// Tiers for the mainland regime, ascending.
    pub mainland_tiers: Vec<AccrualTier>,
    /// Tiers for the flat-rate regime, ascending.
    pub flat_rate_tiers: Vec<AccrualTier>,
}

impl AccrualRules {
    /// Returns the tier table for a regime.
    pub fn tiers_for(&self, regime: Regime) -> &[AccrualTier] {
        match regime {
            Regime::Mainland => &self.mainland_tiers,
            Regime::FlatRate => &self.flat_rate_tiers,
        }
    }
}

/// One resignation entitlement tier, keyed by its inclusive lower bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResignationTier {
    /// Service years at which this tier starts (inclusive).
    pub from_years: Decimal,
    /// Fraction of the accrued gratuity payable, in `[0, 1]`.
    pub percentage: Decimal,
}

/// Resignation entitlement rules for unlimited contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResignationRules {
    /// Reference to the provision defining the reduction.
    pub clause: String,
    /// Tiers ordered by ascending `from_years`, the first starting at zero.
    pub tiers: Vec<ResignationTier>,
}

impl ResignationRules {
    /// Returns the percentage for the tier containing `years`.
    ///
    /// Tiers are half-open on the upper bound, so a value exactly on a
    /// boundary belongs to the higher tier.
    pub fn percentage_for(&self, years: Decimal) -> Decimal {
        self.tiers
            .iter()
            .rev()
            .find(|tier| years >= tier.from_years)
            .map(|tier| tier.percentage)
            .unwrap_or(Decimal::ZERO)
    }
}

/// The statutory ceiling on gratuity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapRules {
    /// Reference to the provision setting the cap.
    pub clause: String,
    /// The cap expressed in months of basic salary.
    pub months_of_salary: Decimal,
}

/// Bounds applied by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Salaries below this are accepted with a warning.
    pub min_plausible_salary: Decimal,
    /// Salaries above this are accepted with a warning.
    pub max_plausible_salary: Decimal,
    /// Salaries above this are rejected.
    pub max_salary: Decimal,
    /// Service spans longer than this many years are rejected.
    pub max_service_years: u32,
}

/// Combined cap and validation limits, as stored in `limits.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// The statutory cap.
    pub cap: CapRules,
    /// Validation bounds.
    pub validation: ValidationLimits,
}

/// How one jurisdiction code maps onto an accrual regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionRule {
    /// Lowercase jurisdiction code (e.g., "difc").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The accrual regime applied.
    pub regime: Regime,
    /// True when the regime is a known approximation of the real law.
    #[serde(default)]
    pub approximation: bool,
    /// Provisions cited for calculations in this jurisdiction.
    #[serde(default)]
    pub legal_references: Vec<String>,
}

/// The jurisdiction table, as stored in `jurisdictions.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionTable {
    /// The code used for absent or unknown free zones.
    pub default_code: String,
    /// One rule per jurisdiction code.
    pub rules: Vec<JurisdictionRule>,
}

impl JurisdictionTable {
    /// Looks up a rule by normalised code.
    pub fn get(&self, code: &str) -> Option<&JurisdictionRule> {
        self.rules.iter().find(|rule| rule.code == code)
    }

    /// Returns the default rule.
    pub fn default_rule(&self) -> Option<&JurisdictionRule> {
        self.get(&self.default_code)
    }

    /// Returns all known codes, in table order.
    pub fn codes(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.code.as_str()).collect()
    }
}

/// The complete, immutable set of rules the engine evaluates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule set metadata.
    pub metadata: RuleSetMetadata,
    /// Accrual rules.
    pub accrual: AccrualRules,
    /// Resignation entitlement rules.
    pub resignation: ResignationRules,
    /// The statutory cap.
    pub cap: CapRules,
    /// Validation bounds.
    pub limits: ValidationLimits,
    /// Jurisdiction-to-regime mapping.
    pub jurisdictions: JurisdictionTable,
}

fn tier(label: &str, up_to_years: Option<i64>, days_per_year: i64) -> AccrualTier {
    AccrualTier {
        label: label.to_string(),
        up_to_years: up_to_years.map(Decimal::from),
        days_per_year: Decimal::from(days_per_year),
    }
}

fn jurisdiction(code: &str, name: &str, regime: Regime, references: &[&str]) -> JurisdictionRule {
    JurisdictionRule {
        code: code.to_string(),
        name: name.to_string(),
        regime,
        approximation: false,
        legal_references: references.iter().map(|r| r.to_string()).collect(),
    }
}

const FEDERAL_LAW: &str = "UAE Federal Decree-Law No. 33 of 2021, Article 51";
const FEDERAL_REGULATION: &str = "Cabinet Resolution No. 1 of 2022";

impl RuleSet {
    /// Builds the statutory UAE rule set.
    ///
    /// # Example
    ///
    /// ```
    /// use gratuity_engine::config::RuleSet;
    /// use gratuity_engine::models::Regime;
    ///
    /// let rules = RuleSet::uae();
    /// assert!(rules.validate().is_ok());
    /// assert_eq!(rules.jurisdictions.get("difc").unwrap().regime, Regime::FlatRate);
    /// ```
    pub fn uae() -> Self {
        let mut adgm = jurisdiction(
            "adgm",
            "Abu Dhabi Global Market",
            Regime::FlatRate,
            &["ADGM Employment Regulations 2019, Section 62"],
        );
        adgm.approximation = true;

        let mainland_zones = [
            ("dmcc", "Dubai Multi Commodities Centre"),
            ("jafza", "Jebel Ali Free Zone"),
            ("dafza", "Dubai Airport Free Zone"),
            ("dso", "Dubai Silicon Oasis"),
            ("dic", "Dubai Internet City"),
            ("dhcc", "Dubai Healthcare City"),
            ("kizad", "Khalifa Industrial Zone Abu Dhabi"),
            ("masdar", "Masdar City Free Zone"),
            ("twofour54", "twofour54 Abu Dhabi"),
            ("rakez", "Ras Al Khaimah Economic Zone"),
            ("saif", "Sharjah Airport International Free Zone"),
            ("ajman", "Ajman Free Zone"),
        ];

        let mut rules = vec![jurisdiction(
            "mainland",
            "UAE Mainland",
            Regime::Mainland,
            &[FEDERAL_LAW, FEDERAL_REGULATION],
        )];
        rules.push(jurisdiction(
            "difc",
            "Dubai International Financial Centre",
            Regime::FlatRate,
            &["DIFC Employment Law No. 2 of 2019, Article 66"],
        ));
        rules.push(adgm);
        rules.extend(mainland_zones.iter().map(|(code, name)| {
            jurisdiction(code, name, Regime::Mainland, &[FEDERAL_LAW, FEDERAL_REGULATION])
        }));

        RuleSet {
            metadata: RuleSetMetadata {
                code: "uae-eosb".to_string(),
                name: "UAE End of Service Benefits".to_string(),
                version: "2022-02-02".to_string(),
                source_url: "https://u.ae/en/information-and-services/jobs/employment-in-the-private-sector/end-of-service-benefits-for-employees-in-the-private-sector".to_string(),
            },
            accrual: AccrualRules {
                clause: "Article 51(1)".to_string(),
                days_per_month: Decimal::from(30),
                minimum_service_years: Decimal::ONE,
                minimum_service_clause: "Article 51(1): one year of continuous service"
                    .to_string(),
                mainland_tiers: vec![
                    tier("First 5 years", Some(5), 21),
                    tier("After 5 years", None, 30),
                ],
                flat_rate_tiers: vec![tier("Full service period", None, 21)],
            },
            resignation: ResignationRules {
                clause: "Resignation entitlement reduction for unlimited contracts".to_string(),
                tiers: vec![
                    ResignationTier {
                        from_years: Decimal::ZERO,
                        percentage: Decimal::ZERO,
                    },
                    ResignationTier {
                        from_years: Decimal::ONE,
                        percentage: Decimal::new(3333, 4),
                    },
                    ResignationTier {
                        from_years: Decimal::from(3),
                        percentage: Decimal::new(6667, 4),
                    },
                    ResignationTier {
                        from_years: Decimal::from(5),
                        percentage: Decimal::ONE,
                    },
                ],
            },
            cap: CapRules {
                clause: "Article 51(4): total gratuity may not exceed two years' wage".to_string(),
                months_of_salary: Decimal::from(24),
            },
            limits: ValidationLimits {
                min_plausible_salary: Decimal::from(1_000),
                max_plausible_salary: Decimal::from(1_000_000),
                max_salary: Decimal::from(10_000_000),
                max_service_years: 50,
            },
            jurisdictions: JurisdictionTable {
                default_code: DEFAULT_FREE_ZONE.to_string(),
                rules,
            },
        }
    }

    /// Checks the tables for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleSet`] if:
    /// - a tier table is empty, unordered, or its last tier is bounded
    /// - a resignation tier table does not start at zero or is unordered
    /// - a percentage lies outside `[0, 1]`
    /// - a divisor or the cap is not positive
    /// - the default jurisdiction is missing or a code appears twice
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| Err(EngineError::InvalidRuleSet { message });

        if self.accrual.days_per_month <= Decimal::ZERO {
            return invalid("days_per_month must be positive".to_string());
        }
        if self.accrual.minimum_service_years < Decimal::ZERO {
            return invalid("minimum_service_years cannot be negative".to_string());
        }

        for (name, tiers) in [
            ("mainland_tiers", &self.accrual.mainland_tiers),
            ("flat_rate_tiers", &self.accrual.flat_rate_tiers),
        ] {
            validate_accrual_tiers(name, tiers)?;
        }

        let tiers = &self.resignation.tiers;
        match tiers.first() {
            Some(first) if first.from_years == Decimal::ZERO => {}
            _ => return invalid("resignation tiers must start at 0 years".to_string()),
        }
        if tiers.windows(2).any(|w| w[0].from_years >= w[1].from_years) {
            return invalid("resignation tiers must be strictly ascending".to_string());
        }
        if tiers
            .iter()
            .any(|t| t.percentage < Decimal::ZERO || t.percentage > Decimal::ONE)
        {
            return invalid("resignation percentages must lie in [0, 1]".to_string());
        }

        if self.cap.months_of_salary <= Decimal::ZERO {
            return invalid("cap months_of_salary must be positive".to_string());
        }
        if self.limits.min_plausible_salary > self.limits.max_plausible_salary
            || self.limits.max_plausible_salary > self.limits.max_salary
        {
            return invalid("salary limits must be ordered min <= plausible max <= max".to_string());
        }

        if self.jurisdictions.default_rule().is_none() {
            return invalid(format!(
                "default jurisdiction '{}' is not in the table",
                self.jurisdictions.default_code
            ));
        }
        let codes = self.jurisdictions.codes();
        for (i, code) in codes.iter().enumerate() {
            if codes[..i].contains(code) {
                return invalid(format!("jurisdiction '{}' is listed twice", code));
            }
        }

        Ok(())
    }
}

fn validate_accrual_tiers(name: &str, tiers: &[AccrualTier]) -> EngineResult<()> {
    let invalid = |message: String| Err(EngineError::InvalidRuleSet { message });

    let Some(last) = tiers.last() else {
        return invalid(format!("{} must not be empty", name));
    };
    if last.up_to_years.is_some() {
        return invalid(format!("the last of {} must be open-ended", name));
    }
    if tiers[..tiers.len() - 1]
        .iter()
        .any(|t| t.up_to_years.is_none())
    {
        return invalid(format!("only the last of {} may be open-ended", name));
    }
    let bounds: Vec<Decimal> = tiers.iter().filter_map(|t| t.up_to_years).collect();
    if bounds.first().is_some_and(|b| *b <= Decimal::ZERO)
        || bounds.windows(2).any(|w| w[0] >= w[1])
    {
        return invalid(format!("{} bounds must be positive and ascending", name));
    }
    if tiers.iter().any(|t| t.days_per_year < Decimal::ZERO) {
        return invalid(format!("{} days_per_year cannot be negative", name));
    }
    Ok(())
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::uae()
    }
}
