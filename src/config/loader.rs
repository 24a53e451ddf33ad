//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading gratuity rule
//! tables from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::normalize_code;

use super::types::{
    AccrualRules, JurisdictionRule, JurisdictionTable, LimitsConfig, ResignationRules, RuleSet,
    RuleSetMetadata,
};

/// Loads and provides access to a gratuity rule set.
///
/// # Directory Structure
///
/// ```text
/// config/uae/
/// ├── ruleset.yaml        # Rule set metadata
/// ├── accrual.yaml        # Daily wage divisor, minimum service, tier tables
/// ├── resignation.yaml    # Resignation entitlement tiers
/// ├── limits.yaml         # Statutory cap and validation bounds
/// └── jurisdictions.yaml  # Free-zone code to regime mapping
/// ```
///
/// # Example
///
/// ```no_run
/// use gratuity_engine::config::ConfigLoader;
///
/// let rules = ConfigLoader::load("./config/uae").unwrap().into_rules();
/// let difc = rules.jurisdictions.get("difc").unwrap();
/// println!("{} uses the {} regime", difc.name, difc.regime);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rules: RuleSet,
}

impl ConfigLoader {
    /// Loads and validates a rule set from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML or is missing a required field
    /// - The loaded tables fail [`RuleSet::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RuleSetMetadata>(&path.join("ruleset.yaml"))?;
        let accrual = Self::load_yaml::<AccrualRules>(&path.join("accrual.yaml"))?;
        let resignation = Self::load_yaml::<ResignationRules>(&path.join("resignation.yaml"))?;
        let limits = Self::load_yaml::<LimitsConfig>(&path.join("limits.yaml"))?;
        let jurisdictions = Self::load_yaml::<JurisdictionTable>(&path.join("jurisdictions.yaml"))?;

        let rules = RuleSet {
            metadata,
            accrual,
            resignation,
            cap: limits.cap,
            limits: limits.validation,
            jurisdictions: Self::normalize_jurisdictions(jurisdictions),
        };
        rules.validate()?;

        Ok(Self { rules })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Lowercases codes so lookups match normalised input.
    fn normalize_jurisdictions(table: JurisdictionTable) -> JurisdictionTable {
        JurisdictionTable {
            default_code: normalize_code(&table.default_code),
            rules: table
                .rules
                .into_iter()
                .map(|rule| JurisdictionRule {
                    code: normalize_code(&rule.code),
                    ..rule
                })
                .collect(),
        }
    }

    /// Returns the loaded rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Consumes the loader, returning the rule set.
    pub fn into_rules(self) -> RuleSet {
        self.rules
    }

}
