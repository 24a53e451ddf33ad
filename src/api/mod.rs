//! HTTP API module for the Gratuity Engine.
//!
//! This module provides the REST endpoints for validating input, computing
//! gratuity, projecting extended service, and listing jurisdictions.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, ProjectionRequest};
pub use response::{ApiError, ApiErrorResponse, outcome_status};
pub use state::AppState;
