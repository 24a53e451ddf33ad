//! Integration tests for the Gratuity Engine HTTP API.
//!
//! This test suite covers:
//! - Mainland accrual across the five-year tier break
//! - Resignation entitlement tiers for unlimited contracts
//! - The statutory cap
//! - DIFC and ADGM flat-rate accrual
//! - Service under the qualifying minimum
//! - Projection of extended service
//! - Validation and error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use gratuity_engine::api::{AppState, create_router};
use gratuity_engine::engine::GratuityEngine;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let engine = GratuityEngine::from_config_dir("./config/uae").expect("Failed to load config");
    create_router(AppState::new(engine))
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

fn create_request(
    salary: &str,
    start: &str,
    end: &str,
    contract_type: &str,
    reason: &str,
    free_zone: &str,
) -> Value {
    json!({
        "contractType": contract_type,
        "basicSalary": salary,
        "startDate": start,
        "endDate": end,
        "terminationReason": reason,
        "freeZone": free_zone,
        "asOf": "2024-06-30"
    })
}

async fn calculate(body: Value) -> Value {
    let (status, json) = post(create_router_for_test(), "/gratuity/calculate", body).await;
    assert_eq!(status, StatusCode::OK, "Unexpected response: {}", json);
    assert_eq!(json["success"], true);
    json
}

// =============================================================================
// Mainland Accrual
// =============================================================================

#[tokio::test]
async fn test_scenario_a_seven_years_mainland_termination() {
    let json = calculate(create_request(
        "10000",
        "2015-01-01",
        "2022-01-01",
        "unlimited",
        "termination",
        "mainland",
    ))
    .await;
    let data = &json["data"];

    assert_eq!(decimal(&data["daily_rate"]), dec("333.33"));
    assert_eq!(data["breakdown"].as_array().unwrap().len(), 2);
    assert_eq!(decimal(&data["breakdown"][0]["amount"]), dec("34999.65"));
    assert_eq!(decimal(&data["breakdown"][1]["amount"]), dec("19999.80"));
    assert_eq!(decimal(&data["total_gratuity"]), dec("54999.45"));
    assert_eq!(decimal(&data["entitlement_percentage"]), Decimal::ONE);
    assert_eq!(data["max_gratuity_exceeded"], false);
    assert_eq!(data["years_of_service"], 7);
    assert_eq!(data["months_of_service"], 0);
    assert_eq!(data["days_of_service"], 0);
    assert_eq!(json["warnings"], json!([]));
}

#[tokio::test]
async fn test_scenario_b_resignation_after_seven_years_is_unreduced() {
    let json = calculate(create_request(
        "10000",
        "2015-01-01",
        "2022-01-01",
        "unlimited",
        "resignation",
        "mainland",
    ))
    .await;

    assert_eq!(decimal(&json["data"]["total_gratuity"]), dec("54999.45"));
    assert_eq!(decimal(&json["data"]["entitlement_percentage"]), Decimal::ONE);
}

#[tokio::test]
async fn test_scenario_c_eight_years_resignation() {
    let json = calculate(create_request(
        "15000",
        "2016-01-01",
        "2024-01-01",
        "unlimited",
        "resignation",
        "mainland",
    ))
    .await;
    let data = &json["data"];

    assert_eq!(decimal(&data["breakdown"][0]["amount"]), dec("52500"));
    assert_eq!(decimal(&data["breakdown"][1]["amount"]), dec("45000"));
    assert_eq!(decimal(&data["total_gratuity"]), dec("97500"));
}

#[tokio::test]
async fn test_scenario_d_thirty_years_hits_cap() {
    let json = calculate(create_request(
        "5000",
        "1990-01-01",
        "2020-01-01",
        "unlimited",
        "termination",
        "mainland",
    ))
    .await;
    let data = &json["data"];

    assert_eq!(decimal(&data["total_gratuity"]), dec("120000"));
    assert_eq!(decimal(&data["max_gratuity"]), dec("120000"));
    assert_eq!(data["max_gratuity_exceeded"], true);
    assert!(decimal(&data["unscaled_gratuity"]) > dec("120000"));
}

#[tokio::test]
async fn test_numeric_salary_is_accepted() {
    let mut body = create_request(
        "0",
        "2015-01-01",
        "2022-01-01",
        "unlimited",
        "termination",
        "mainland",
    );
    body["basicSalary"] = json!(10000);
    let json = calculate(body).await;
    assert_eq!(decimal(&json["data"]["total_gratuity"]), dec("54999.45"));
}

// =============================================================================
// Resignation Tiers
// =============================================================================

#[tokio::test]
async fn test_resignation_tiers_by_service_length() {
    let cases = [
        ("2020-01-01", "2022-01-01", "0.3333"),
        ("2019-01-01", "2022-01-01", "0.6667"),
        ("2018-01-01", "2022-01-01", "0.6667"),
        ("2016-01-01", "2021-01-01", "1"),
        ("2017-01-01", "2022-01-01", "0.6667"),
    ];

    for (start, end, expected) in cases {
        let json = calculate(create_request(
            "10000",
            start,
            end,
            "unlimited",
            "resignation",
            "mainland",
        ))
        .await;
        assert_eq!(
            decimal(&json["data"]["entitlement_percentage"]),
            dec(expected),
            "{} to {}",
            start,
            end
        );
    }
}

#[tokio::test]
async fn test_two_years_resignation_amount() {
    let json = calculate(create_request(
        "10000",
        "2020-01-01",
        "2022-01-01",
        "unlimited",
        "resignation",
        "mainland",
    ))
    .await;
    let data = &json["data"];

    assert_eq!(decimal(&data["unscaled_gratuity"]), dec("13999.86"));
    assert_eq!(decimal(&data["total_gratuity"]), dec("4666.15"));
    let references = data["legal_references"].as_array().unwrap();
    assert!(references
        .iter()
        .any(|r| r.as_str().unwrap().contains("Resignation")));
}

#[tokio::test]
async fn test_limited_contract_resignation_is_unreduced() {
    let json = calculate(create_request(
        "10000",
        "2020-01-01",
        "2022-01-01",
        "limited",
        "resignation",
        "mainland",
    ))
    .await;
    assert_eq!(decimal(&json["data"]["entitlement_percentage"]), Decimal::ONE);
    assert_eq!(decimal(&json["data"]["total_gratuity"]), dec("13999.86"));
}

// =============================================================================
// Free Zones
// =============================================================================

#[tokio::test]
async fn test_difc_flat_rate() {
    let json = calculate(create_request(
        "15000",
        "2016-01-01",
        "2024-01-01",
        "unlimited",
        "termination",
        "DIFC",
    ))
    .await;
    let data = &json["data"];

    assert_eq!(data["regime"], "flat_rate");
    assert_eq!(data["jurisdiction"], "difc");
    assert_eq!(data["breakdown"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&data["breakdown"][0]["days_per_year"]), dec("21"));
    // 500 x 21 x 8
    assert_eq!(decimal(&data["total_gratuity"]), dec("84000"));
}

#[tokio::test]
async fn test_adgm_flat_rate_is_flagged() {
    let json = calculate(create_request(
        "15000",
        "2016-01-01",
        "2024-01-01",
        "unlimited",
        "termination",
        "adgm",
    ))
    .await;

    assert_eq!(json["data"]["regime"], "flat_rate");
    assert_eq!(json["warnings"][0]["code"], "JURISDICTION_APPROXIMATED");
    assert_eq!(json["warnings"][0]["severity"], "warning");
}

#[tokio::test]
async fn test_free_zone_without_own_law_uses_mainland() {
    let json = calculate(create_request(
        "15000",
        "2016-01-01",
        "2024-01-01",
        "unlimited",
        "termination",
        "jafza",
    ))
    .await;

    assert_eq!(json["data"]["regime"], "mainland");
    assert_eq!(json["data"]["jurisdiction"], "jafza");
    assert_eq!(decimal(&json["data"]["total_gratuity"]), dec("97500"));
}

#[tokio::test]
async fn test_unknown_free_zone_warns_once_and_uses_mainland() {
    let json = calculate(create_request(
        "15000",
        "2016-01-01",
        "2024-01-01",
        "unlimited",
        "termination",
        "atlantis",
    ))
    .await;

    assert_eq!(json["data"]["jurisdiction"], "mainland");
    let warnings = json["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["code"], "UNKNOWN_FREE_ZONE");
}

// =============================================================================
// Minimum Service
// =============================================================================

#[tokio::test]
async fn test_under_one_year_is_zero_with_reason() {
    let json = calculate(create_request(
        "10000",
        "2023-03-01",
        "2023-12-31",
        "unlimited",
        "termination",
        "mainland",
    ))
    .await;
    let data = &json["data"];

    assert_eq!(decimal(&data["total_gratuity"]), Decimal::ZERO);
    assert_eq!(data["breakdown"], json!([]));
    assert!(data["reason"].as_str().unwrap().contains("minimum"));
    assert_eq!(json["warnings"][0]["code"], "SERVICE_UNDER_MINIMUM");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_salary_returns_422_with_field() {
    let (status, json) = post(
        create_router_for_test(),
        "/gratuity/calculate",
        create_request(
            "abc",
            "2015-01-01",
            "2022-01-01",
            "unlimited",
            "termination",
            "mainland",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "INVALID_SALARY");
    assert_eq!(json["error"]["field"], "basic_salary");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_future_start_date_is_rejected() {
    let (status, json) = post(
        create_router_for_test(),
        "/gratuity/calculate",
        create_request(
            "10000",
            "2025-01-01",
            "2027-01-01",
            "unlimited",
            "termination",
            "mainland",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "FUTURE_START_DATE");
}

#[tokio::test]
async fn test_validate_endpoint_reports_all_problems() {
    let (status, json) = post(
        create_router_for_test(),
        "/gratuity/validate",
        json!({
            "contract_type": "permanent",
            "basic_salary": "-5",
            "start_date": "2022-01-01",
            "end_date": "2021-01-01",
            "termination_reason": "termination",
            "as_of": "2024-06-30"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_valid"], false);
    let codes: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap())
        .collect();
    assert_eq!(
        codes,
        vec![
            "NEGATIVE_SALARY",
            "END_DATE_BEFORE_START_DATE",
            "INVALID_CONTRACT_TYPE"
        ]
    );
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gratuity/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"basicSalary\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Projection
// =============================================================================

#[tokio::test]
async fn test_projection_crosses_tier_break() {
    let mut body = create_request(
        "10000",
        "2020-01-01",
        "2024-01-01",
        "unlimited",
        "termination",
        "mainland",
    );
    body["additionalYears"] = json!(3);

    let (status, json) = post(create_router_for_test(), "/gratuity/project", body).await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["years_of_service"], 7);
    assert_eq!(data["breakdown"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_projection_of_invalid_input_returns_422() {
    let mut body = create_request(
        "",
        "2020-01-01",
        "2024-01-01",
        "unlimited",
        "termination",
        "mainland",
    );
    body["additionalYears"] = json!(3);

    let (status, json) = post(create_router_for_test(), "/gratuity/project", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "MISSING_FIELD");
}

// =============================================================================
// Jurisdictions
// =============================================================================

#[tokio::test]
async fn test_list_jurisdictions() {
    let (status, json) = get(create_router_for_test(), "/gratuity/jurisdictions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["default_code"], "mainland");
    let codes: Vec<&str> = json["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"difc"));
    assert!(codes.contains(&"adgm"));
}

#[tokio::test]
async fn test_get_jurisdiction_by_code() {
    let (status, json) = get(create_router_for_test(), "/gratuity/jurisdictions/ADGM").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["regime"], "flat_rate");
    assert_eq!(json["approximation"], true);
}
