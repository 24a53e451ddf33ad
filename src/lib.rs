//! Gratuity Engine for UAE End-of-Service Benefits
//!
//! This crate computes end-of-service gratuity under the UAE federal labour
//! law and the DIFC/ADGM free-zone regimes. It validates loosely-typed form
//! input, selects the jurisdiction's accrual regime, accrues by tier, applies
//! resignation entitlement and the statutory cap, and returns the figure with
//! a full audit breakdown.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod validation;
