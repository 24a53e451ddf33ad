//! HTTP request handlers for the Gratuity Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{CalculationRequest, ProjectionRequest};
use super::response::{ApiError, ApiErrorResponse, outcome_status};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/gratuity/calculate", post(calculate_handler))
        .route("/gratuity/validate", post(validate_handler))
        .route("/gratuity/project", post(project_handler))
        .route("/gratuity/jurisdictions", get(list_jurisdictions_handler))
        .route("/gratuity/jurisdictions/:code", get(get_jurisdiction_handler))
        .with_state(state)
}

/// Handler for POST /gratuity/calculate.
///
/// Returns the calculation outcome with 200 on success, 422 when the input
/// is rejected, and 500 when the calculation itself fails.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing gratuity calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let as_of = request.as_of.unwrap_or_else(today);
    let start_time = Instant::now();
    let outcome = state.engine().compute_safe(&request.input, as_of);
    let duration = start_time.elapsed();

    match (&outcome.data, &outcome.error) {
        (Some(result), _) => info!(
            correlation_id = %correlation_id,
            total_gratuity = %result.total_gratuity,
            regime = %result.regime,
            warnings = outcome.warnings.len(),
            duration_us = duration.as_micros(),
            "Calculation completed successfully"
        ),
        (None, Some(error)) => warn!(
            correlation_id = %correlation_id,
            code = ?error.code,
            field = ?error.field,
            "Calculation rejected"
        ),
        (None, None) => {}
    }

    json_response(outcome_status(&outcome), outcome)
}

/// Handler for POST /gratuity/validate.
///
/// Always returns 200 with the validation result; validity is in the body.
async fn validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let result = state
        .engine()
        .validate(&request.input, request.as_of.unwrap_or_else(today));
    info!(
        correlation_id = %correlation_id,
        is_valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validation completed"
    );

    json_response(StatusCode::OK, result)
}

/// Handler for POST /gratuity/project.
async fn project_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing projection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let outcome = state.engine().project(
        &request.input,
        request.additional_years,
        request.as_of.unwrap_or_else(today),
    );
    info!(
        correlation_id = %correlation_id,
        additional_years = request.additional_years,
        success = outcome.success,
        "Projection completed"
    );

    json_response(outcome_status(&outcome), outcome)
}

/// Handler for GET /gratuity/jurisdictions.
async fn list_jurisdictions_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, &state.engine().rules().jurisdictions)
}

/// Handler for GET /gratuity/jurisdictions/:code.
async fn get_jurisdiction_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match state.engine().jurisdiction(&code) {
        Ok(rule) => json_response(StatusCode::OK, rule),
        Err(err) => {
            warn!(code = %code, "Jurisdiction not found");
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Converts a JSON extraction failure into a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        create_router(AppState::default())
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "contract_type": "unlimited",
            "basic_salary": "10000",
            "start_date": "2015-01-01",
            "end_date": "2022-01-01",
            "termination_reason": "termination",
            "as_of": "2024-01-01"
        })
    }

    #[tokio::test]
    async fn test_calculate_valid_request_returns_200() {
        let (status, body) = send(
            create_test_router(),
            post_json("/gratuity/calculate", &valid_body().to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_gratuity"], "54999.45");
    }

    #[tokio::test]
    async fn test_calculate_malformed_json_returns_400() {
        let (status, body) = send(
            create_test_router(),
            post_json("/gratuity/calculate", "{invalid json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_calculate_missing_content_type_returns_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/gratuity/calculate")
            .body(Body::from(valid_body().to_string()))
            .unwrap();
        let (status, body) = send(create_test_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_calculate_invalid_input_returns_422() {
        let mut body = valid_body();
        body["basic_salary"] = json!("-100");
        let (status, body) = send(
            create_test_router(),
            post_json("/gratuity/calculate", &body.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NEGATIVE_SALARY");
        assert_eq!(body["error"]["field"], "basic_salary");
    }

    #[tokio::test]
    async fn test_validate_returns_200_with_errors() {
        let (status, body) = send(
            create_test_router(),
            post_json("/gratuity/validate", "{}"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_project_missing_years_returns_400() {
        let (status, body) = send(
            create_test_router(),
            post_json("/gratuity/project", &valid_body().to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_unknown_jurisdiction_returns_404() {
        let request = Request::builder()
            .uri("/gratuity/jurisdictions/atlantis")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(create_test_router(), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "JURISDICTION_NOT_FOUND");
    }
}
