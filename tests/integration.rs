//! Integration tests for the Freight Quote Engine.
//!
//! This test suite drives the HTTP API against the bundled DHL US import
//! rate source and covers:
//! - Gross weight quotes (flat range and multiplier bands)
//! - Per-piece quotes with absent slots
//! - Band boundary discontinuities
//! - Form coercion
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use freight_quote::api::{AppState, create_router};
use freight_quote::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/dhl_us_import").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_quote(router: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/quote")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

fn gross_weight_form(country: &str, gross_weight_kg: Value) -> Value {
    json!({
        "country": country,
        "method": "gross_weight",
        "gross_weight_kg": gross_weight_kg
    })
}

fn per_piece_form(country: &str, piece_weight_grams: Value, quantities: Value) -> Value {
    json!({
        "country": country,
        "method": "per_piece",
        "piece_weight_grams": piece_weight_grams,
        "quantities": quantities
    })
}

fn as_decimal(value: &Value) -> Decimal {
    decimal(value.as_str().expect("Expected a decimal string"))
}

fn gross_line(result: &Value) -> &Value {
    assert_eq!(result["outcome"]["method"], "gross_weight");
    &result["outcome"]["line"]
}

fn assert_amount(line: &Value, expected: &str) {
    assert_eq!(
        as_decimal(&line["amount"]),
        decimal(expected),
        "Unexpected amount in {}",
        line
    );
}

fn assert_error_code(status: StatusCode, body: &Value, expected_status: StatusCode, code: &str) {
    assert_eq!(status, expected_status, "Unexpected status for {}", body);
    assert_eq!(body["code"], code);
}

// =============================================================================
// SECTION 1: Gross Weight Quotes
// =============================================================================

#[tokio::test]
async fn test_gross_weight_flat_range() {
    // 4 kg bills as 4 kg, +1 kg buffer = 5 kg
    let (status, result) =
        post_quote(create_router_for_test(), gross_weight_form("Thailand", json!(4))).await;

    assert_eq!(status, StatusCode::OK);
    let line = gross_line(&result);
    assert_eq!(as_decimal(&line["billing_weight_kg"]), decimal("4"));
    assert_eq!(as_decimal(&line["buffered_weight_kg"]), decimal("5"));
    assert_eq!(line["basis"]["kind"], "flat");
    assert_amount(line, "82.45");
}

#[tokio::test]
async fn test_gross_weight_half_remainder_rounds_to_next_kilogram() {
    // 5.5 kg bills as 6 kg, +2 kg buffer = 8 kg
    let (status, result) =
        post_quote(create_router_for_test(), gross_weight_form("China", json!("5.5"))).await;

    assert_eq!(status, StatusCode::OK);
    let line = gross_line(&result);
    assert_eq!(as_decimal(&line["billing_weight_kg"]), decimal("6"));
    assert_eq!(as_decimal(&line["buffered_weight_kg"]), decimal("8"));
    assert_amount(line, "105.40");
}

#[tokio::test]
async fn test_gross_weight_end_to_end_china() {
    // 63.2 -> 63.5 -> +8 -> 71.5 kg x 8.95
    let (status, result) =
        post_quote(create_router_for_test(), gross_weight_form("China", json!(63.2))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["zone"], "china");
    let line = gross_line(&result);
    assert_eq!(as_decimal(&line["raw_weight_kg"]), decimal("63.2"));
    assert_eq!(as_decimal(&line["billing_weight_kg"]), decimal("63.5"));
    assert_eq!(as_decimal(&line["buffer_kg"]), decimal("8"));
    assert_eq!(line["basis"]["kind"], "multiplier");
    assert_eq!(as_decimal(&line["basis"]["multiplier"]), decimal("8.95"));
    assert_amount(line, "639.925");
}

#[tokio::test]
async fn test_band_boundary_is_inclusive() {
    // 133 + 17 = 150 kg, the top of the first band
    let (_, result) =
        post_quote(create_router_for_test(), gross_weight_form("China", json!(133))).await;
    let line = gross_line(&result);
    assert_eq!(as_decimal(&line["buffered_weight_kg"]), decimal("150"));
    assert_amount(line, "1342.50");

    // 133.5 + 17 = 150.5 kg, priced from the next band
    let (_, result) =
        post_quote(create_router_for_test(), gross_weight_form("China", json!(133.5))).await;
    let line = gross_line(&result);
    assert_eq!(as_decimal(&line["buffered_weight_kg"]), decimal("150.5"));
    assert_amount(line, "1219.05");
}

#[tokio::test]
async fn test_heavy_shipment_uses_unbounded_band() {
    // 1200.2 -> 1200.5 -> +40 -> 1240.5 kg x 6.55
    let (status, result) =
        post_quote(create_router_for_test(), gross_weight_form("Hong Kong", json!(1200.2))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["zone"], "taiwan_hong_kong");
    let line = gross_line(&result);
    assert!(line["basis"]["band_up_to_kg"].is_null());
    assert_amount(line, "8125.275");
}

#[tokio::test]
async fn test_country_lookup_ignores_case_and_whitespace() {
    let (status, result) =
        post_quote(create_router_for_test(), gross_weight_form("  tHaIlAnD ", json!(4))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["country"], "tHaIlAnD");
    assert_eq!(result["zone"], "thailand");
}

// =============================================================================
// SECTION 2: Per-Piece Quotes
// =============================================================================

#[tokio::test]
async fn test_per_piece_absent_slots() {
    let (status, result) = post_quote(
        create_router_for_test(),
        per_piece_form("Taiwan", json!(500), json!([10, 0, 5, 0, 0])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["outcome"]["method"], "per_piece");

    let slots = result["outcome"]["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 5);
    assert!(slots[1].is_null());
    assert!(slots[3].is_null());
    assert!(slots[4].is_null());

    // 10 x 500 g = 5 kg -> 6 kg
    assert_eq!(slots[0]["slot"], 1);
    assert_amount(&slots[0], "82.15");
    // 5 x 500 g = 2.5 kg -> 3.5 kg
    assert_eq!(slots[2]["slot"], 3);
    assert_amount(&slots[2], "60.78");
}

#[tokio::test]
async fn test_per_piece_coerces_blank_and_text_quantities() {
    let (status, result) = post_quote(
        create_router_for_test(),
        json!({
            "country": "China",
            "method": "Per Piece",
            "piece_weight_grams": "333.3",
            "quantities": ["3", "", "many", null, "0"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let slots = result["outcome"]["slots"].as_array().unwrap();
    // 3 x 333.3 g = 0.9999 kg -> 1 kg -> +1 = 2 kg
    assert_eq!(as_decimal(&slots[0]["billing_weight_kg"]), decimal("1"));
    assert_amount(&slots[0], "50.80");
    assert!(slots[1..].iter().all(Value::is_null));
}

#[tokio::test]
async fn test_per_piece_accepts_exponent_quantities() {
    // 1e3 x 1 g = 1 kg -> +1 = 2 kg
    let (status, result) = post_quote(
        create_router_for_test(),
        per_piece_form("China", json!("1"), json!(["1e3"])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let slots = result["outcome"]["slots"].as_array().unwrap();
    assert_eq!(as_decimal(&slots[0]["quantity"]), decimal("1000"));
    assert_eq!(as_decimal(&slots[0]["buffered_weight_kg"]), decimal("2"));
    assert_amount(&slots[0], "50.80");
}

#[tokio::test]
async fn test_per_piece_audit_trace_covers_each_slot() {
    let (_, result) = post_quote(
        create_router_for_test(),
        per_piece_form("China", json!(500), json!([10, 0, 5])),
    )
    .await;

    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 7);
    assert_eq!(steps[0]["rule_id"], "zone_resolution");
    let rate_steps: Vec<&Value> = steps
        .iter()
        .filter(|step| step["rule_id"] == "rate_resolution")
        .collect();
    assert_eq!(rate_steps.len(), 2);
    assert_eq!(rate_steps[0]["slot"], 1);
    assert_eq!(rate_steps[1]["slot"], 3);
}

// =============================================================================
// SECTION 3: Error Cases
// =============================================================================

#[tokio::test]
async fn test_unsupported_country_returns_400() {
    let (status, body) =
        post_quote(create_router_for_test(), gross_weight_form("France", json!(10))).await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "UNSUPPORTED_COUNTRY");
    assert!(body["message"].as_str().unwrap().contains("France"));
}

#[tokio::test]
async fn test_blank_piece_weight_returns_400() {
    let (status, body) = post_quote(
        create_router_for_test(),
        per_piece_form("China", json!(""), json!([1, 2])),
    )
    .await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "INVALID_INPUT");
    assert_eq!(body["details"], "piece_weight_grams");
}

#[tokio::test]
async fn test_zero_gross_weight_returns_400() {
    let (status, body) =
        post_quote(create_router_for_test(), gross_weight_form("China", json!(0))).await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "INVALID_INPUT");
}

#[tokio::test]
async fn test_too_many_quantities_returns_400() {
    let (status, body) = post_quote(
        create_router_for_test(),
        per_piece_form("China", json!(100), json!([1, 2, 3, 4, 5, 6])),
    )
    .await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "INVALID_INPUT");
    assert_eq!(body["details"], "quantities");
}

#[tokio::test]
async fn test_largest_decimal_gross_weight_returns_400() {
    let (status, body) = post_quote(
        create_router_for_test(),
        gross_weight_form("China", json!("79228162514264337593543950335")),
    )
    .await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "WEIGHT_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_overflowing_piece_weight_times_quantity_returns_400() {
    let (status, body) = post_quote(
        create_router_for_test(),
        per_piece_form(
            "Thailand",
            json!("1000000000000000"),
            json!(["1000000000000000"]),
        ),
    )
    .await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "WEIGHT_OUT_OF_RANGE");
    assert!(body["message"].as_str().unwrap().contains("slot 1"));
}

#[tokio::test]
async fn test_unknown_method_returns_400() {
    let (status, body) = post_quote(
        create_router_for_test(),
        json!({ "country": "China", "method": "volumetric", "gross_weight_kg": 5 }),
    )
    .await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "INVALID_INPUT");
    assert_eq!(body["details"], "method");
}

#[tokio::test]
async fn test_missing_method_returns_validation_error() {
    let (status, body) =
        post_quote(create_router_for_test(), json!({ "country": "China" })).await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/quote")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"country\": "))
        .unwrap();

    let (status, body) = send(create_router_for_test(), request).await;

    assert_error_code(status, &body, StatusCode::BAD_REQUEST, "MALFORMED_JSON");
}

// =============================================================================
// SECTION 4: Read-only Endpoints
// =============================================================================

#[tokio::test]
async fn test_countries_lists_zone_columns() {
    let (status, body) = get(create_router_for_test(), "/countries").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["carrier"], "DHL Express");
    assert_eq!(body["currency"], "USD");

    let countries = body["countries"].as_array().unwrap();
    assert_eq!(countries.len(), 4);
    let hong_kong = countries
        .iter()
        .find(|entry| entry["country"] == "Hong Kong")
        .unwrap();
    assert_eq!(hong_kong["zone"], "taiwan_hong_kong");
    assert_eq!(hong_kong["sheet_column"], 10);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(create_router_for_test(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let request = Request::builder()
        .uri("/calculate")
        .body(Body::empty())
        .unwrap();
    let response = create_router_for_test().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
