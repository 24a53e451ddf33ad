//! Application state for the Gratuity Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::GratuityEngine;

/// Shared application state.
///
/// Holds the engine behind an `Arc` so every handler evaluates against the
/// same immutable rule set.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<GratuityEngine>,
}

impl AppState {
    /// Creates a new application state around an engine.
    pub fn new(engine: GratuityEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &GratuityEngine {
        &self.engine
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GratuityEngine::default())
    }
}
