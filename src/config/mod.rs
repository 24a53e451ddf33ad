//! Rule tables for the Gratuity Engine.
//!
//! This module provides the typed [`RuleSet`] the engine evaluates, the
//! statutory UAE defaults, and functionality to load the same tables from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use gratuity_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/uae").unwrap();
//! println!("Loaded rule set: {}", config.rules().metadata.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AccrualRules, AccrualTier, CapRules, JurisdictionRule, JurisdictionTable, LimitsConfig,
    ResignationRules, ResignationTier, RuleSet, RuleSetMetadata, ValidationLimits,
};
