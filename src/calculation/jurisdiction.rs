//! Jurisdiction rule selection.
//!
//! Maps a free-zone code onto an accrual [`Regime`]. The mapping is total:
//! every code resolves to exactly one regime, unknown codes falling back to
//! the table's default (mainland) with a warning.

use crate::config::JurisdictionTable;
use crate::models::{AuditStep, CalculatorError, ErrorCode, Regime, normalize_code};

/// The regime chosen for a free-zone code.
#[derive(Debug, Clone)]
pub struct RegimeSelection {
    /// The accrual regime to apply.
    pub regime: Regime,
    /// The jurisdiction code the regime was taken from.
    pub jurisdiction: String,
    /// Provisions to cite for this jurisdiction.
    pub legal_references: Vec<String>,
    /// Unknown-code and approximation warnings.
    pub warnings: Vec<CalculatorError>,
    /// The audit step recording this selection.
    pub audit_step: AuditStep,
}

/// Builds the warning emitted for a well-formed but unlisted free-zone code.
pub fn unknown_free_zone_warning(code: &str, table: &JurisdictionTable) -> CalculatorError {
    CalculatorError::warning(
        ErrorCode::UnknownFreeZone,
        format!(
            "Free zone '{}' is not recognised; {} rules were applied",
            code, table.default_code
        ),
    )
    .with_field("free_zone")
    .with_details(format!("Known free zones: {}", table.codes().join(", ")))
    .with_suggestion("Check the free-zone code, or omit it for mainland employment")
}

/// Selects the accrual regime for a free-zone code.
///
/// The lookup ignores case. DIFC and ADGM resolve to [`Regime::FlatRate`]
/// (ADGM with a `JURISDICTION_APPROXIMATED` warning); every other listed
/// code, and every unknown code, resolves to the default regime.
///
/// # Examples
///
/// ```
/// use gratuity_engine::calculation::select_regime;
/// use gratuity_engine::config::RuleSet;
/// use gratuity_engine::models::Regime;
///
/// let rules = RuleSet::uae();
///
/// let difc = select_regime(&rules.jurisdictions, "DIFC", 2);
/// assert_eq!(difc.regime, Regime::FlatRate);
/// assert!(difc.warnings.is_empty());
///
/// let unknown = select_regime(&rules.jurisdictions, "atlantis", 2);
/// assert_eq!(unknown.regime, Regime::Mainland);
/// assert_eq!(unknown.warnings.len(), 1);
/// ```
pub fn select_regime(
    table: &JurisdictionTable,
    free_zone: &str,
    step_number: u32,
) -> RegimeSelection {
    let code = normalize_code(free_zone);
    let mut warnings = Vec::new();

    let rule = match table.get(&code) {
        Some(rule) => Some(rule),
        None => {
            warnings.push(unknown_free_zone_warning(&code, table));
            table.default_rule()
        }
    };

    // A validated table always contains its default; fall back to the
    // mainland regime with no citations if it does not.
    let (regime, jurisdiction, legal_references, approximation) = match rule {
        Some(rule) => (
            rule.regime,
            rule.code.clone(),
            rule.legal_references.clone(),
            rule.approximation,
        ),
        None => (Regime::Mainland, table.default_code.clone(), Vec::new(), false),
    };

    if approximation {
        warnings.push(
            CalculatorError::warning(
                ErrorCode::JurisdictionApproximated,
                format!(
                    "The {} regime for '{}' is an approximation of the local employment law",
                    regime, jurisdiction
                ),
            )
            .with_field("free_zone")
            .with_suggestion("Confirm the figure against the jurisdiction's own regulations"),
        );
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "jurisdiction_selection".to_string(),
        rule_name: "Jurisdiction Rule Selection".to_string(),
        clause_ref: legal_references.first().cloned().unwrap_or_default(),
        input: serde_json::json!({
            "free_zone": free_zone
        }),
        output: serde_json::json!({
            "jurisdiction": jurisdiction,
            "regime": regime.as_str(),
            "approximation": approximation,
            "recognised": jurisdiction == code
        }),
        reasoning: if jurisdiction == code {
            format!("Free zone '{}' applies the {} regime", jurisdiction, regime)
        } else {
            format!(
                "Free zone '{}' is not listed; defaulting to '{}' ({} regime)",
                code, jurisdiction, regime
            )
        },
    };

    RegimeSelection {
        regime,
        jurisdiction,
        legal_references,
        warnings,
        audit_step,
    }
}
