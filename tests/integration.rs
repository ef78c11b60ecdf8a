//! Comprehensive integration tests for the reimbursement engine.
//!
//! This test suite covers all calculation scenarios including:
//! - Base reimbursement with category caps
//! - Windows Pro amounts joining the invoice total
//! - Age-based depreciation and the sub-month threshold
//! - Monthly breakdown generation
//! - Processing with installment schedules and re-eligibility dates
//! - Eligibility checks (tenure gate and cooldown)
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

use reimbursement_engine::api::{AppState, create_router};
use reimbursement_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/laptop_policy").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    let d = Decimal::from_str(s).unwrap();
    d.normalize().to_string()
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let router = create_router_for_test();
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

fn create_quote_request(
    joining_date: &str,
    purchase_date: &str,
    category: &str,
    invoice_amount: &str,
) -> Value {
    json!({
        "employee_id": "EMP003",
        "joining_date": joining_date,
        "laptop_purchase_date": purchase_date,
        "category": category,
        "invoice_amount": invoice_amount
    })
}

fn create_stored_request(
    purchase_date: &str,
    joining_date: &str,
    base_amount: &str,
    status: &str,
) -> Value {
    json!({
        "id": "req_001",
        "employee_id": "EMP003",
        "joining_date": joining_date,
        "laptop_purchase_date": purchase_date,
        "category": "Developer",
        "invoice_amount": "100000",
        "base_reimbursement_amount": base_amount,
        "reimbursement_amount": base_amount,
        "status": status
    })
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected amount {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Quote: base reimbursement
// =============================================================================

#[tokio::test]
async fn test_developer_quote_below_cap() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2024-02-10", "Developer", "100000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&body["base_amount"], "75000");
    assert_amount(&body["final_amount"], "75000");
    assert_eq!(body["capped"], json!(false));
    assert_eq!(body["depreciation"]["depreciation_applied"], json!(false));
}

#[tokio::test]
async fn test_non_developer_quote_hits_cap() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2024-02-10", "Non-Developer", "120000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&body["base_amount"], "72000");
    assert_eq!(body["capped"], json!(true));
}

#[tokio::test]
async fn test_developer_quote_hits_cap() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2024-02-10", "Developer", "120000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 0.75 x 120000 = 90000, capped at 82000
    assert_amount(&body["base_amount"], "82000");
    assert_eq!(body["capped"], json!(true));
}

#[tokio::test]
async fn test_windows_pro_amount_joins_invoice_total() {
    let mut request = create_quote_request("2024-01-01", "2024-02-10", "Developer", "100000");
    request["windows_pro_amount"] = json!("8000");

    let (status, body) = post_json("/quote", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&body["invoice_total"], "108000");
    // 0.75 x 108000 = 81000, still below the cap
    assert_amount(&body["base_amount"], "81000");
}

#[tokio::test]
async fn test_quote_audit_trace_records_both_rules() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2022-01-01", "Developer", "120000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["rule_id"].as_str().unwrap(), "base_reimbursement");
    assert_eq!(steps[1]["rule_id"].as_str().unwrap(), "age_depreciation");
    assert_eq!(steps[0]["step_number"].as_u64().unwrap(), 1);
    assert_eq!(steps[1]["step_number"].as_u64().unwrap(), 2);
}

// =============================================================================
// Quote: depreciation
// =============================================================================

#[tokio::test]
async fn test_two_year_old_device_depreciates_forty_percent() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2022-01-01", "Developer", "120000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Base capped at 82000; 24 months x 1.67%/month = 40%
    assert_amount(&body["base_amount"], "82000");
    assert_eq!(body["depreciation"]["months_old"].as_u64().unwrap(), 24);
    assert_eq!(
        body["depreciation"]["depreciation_percentage"]
            .as_u64()
            .unwrap(),
        40
    );
    assert_amount(&body["depreciation"]["depreciated_amount"], "49200");
    assert_amount(&body["final_amount"], "49200");
}

#[tokio::test]
async fn test_purchase_after_joining_is_not_depreciated() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2024-06-01", "Developer", "100000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depreciation"]["depreciation_applied"], json!(false));
    assert_amount(&body["final_amount"], "75000");
    assert!(body["audit_trace"]["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sub_month_gap_suppresses_depreciation_with_warning() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2023-12-20", "Developer", "100000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depreciation"]["depreciation_applied"], json!(false));
    assert_amount(&body["final_amount"], "75000");

    let warnings = body["audit_trace"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["code"].as_str().unwrap(), "SUB_MONTH_AGE_GAP");
}

#[tokio::test]
async fn test_depreciation_caps_at_eighty_percent() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2014-01-01", "Developer", "120000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["depreciation"]["depreciation_percentage"]
            .as_u64()
            .unwrap(),
        80
    );
    // 20% residual of the 82000 base
    assert_amount(&body["final_amount"], "16400");
}

#[tokio::test]
async fn test_monthly_breakdown_is_returned_on_request() {
    let mut request = create_quote_request("2024-01-01", "2022-01-01", "Developer", "120000");
    request["include_monthly_breakdown"] = json!(true);

    let (status, body) = post_json("/quote", request).await;

    assert_eq!(status, StatusCode::OK);
    let breakdown = body["depreciation"]["monthly_breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 24);
    assert_eq!(breakdown[0]["label"].as_str().unwrap(), "Month 1");
    assert_eq!(breakdown[23]["month"].as_u64().unwrap(), 24);
}

#[tokio::test]
async fn test_monthly_breakdown_caps_at_forty_eight_entries() {
    let mut request = create_quote_request("2024-01-01", "2014-01-01", "Developer", "120000");
    request["include_monthly_breakdown"] = json!(true);

    let (status, body) = post_json("/quote", request).await;

    assert_eq!(status, StatusCode::OK);
    let breakdown = body["depreciation"]["monthly_breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 48);
}

#[tokio::test]
async fn test_datetime_inputs_match_date_inputs() {
    let (_, from_dates) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2022-01-01", "Developer", "120000"),
    )
    .await;
    let (status, from_datetimes) = post_json(
        "/quote",
        create_quote_request(
            "2024-01-01T09:30:00Z",
            "2022-01-01T23:59:59",
            "Developer",
            "120000",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(from_dates["final_amount"], from_datetimes["final_amount"]);
    assert_eq!(
        from_dates["depreciation"]["months_old"],
        from_datetimes["depreciation"]["months_old"]
    );
}

// =============================================================================
// Process
// =============================================================================

#[tokio::test]
async fn test_processing_computes_full_schedule() {
    let (status, body) = post_json(
        "/process",
        json!({
            "request": create_stored_request("2024-02-10", "2024-01-01", "48000", "approved"),
            "processed_on": "2024-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&body["reimbursement_amount"], "48000");
    assert_amount(&body["schedule"]["monthly_installment"], "2000");
    assert_amount(&body["schedule"]["final_installment"], "2000");
    assert_eq!(body["schedule"]["start_date"].as_str().unwrap(), "2024-04-01");
    assert_eq!(body["schedule"]["end_date"].as_str().unwrap(), "2026-03-31");
    assert_eq!(
        body["schedule"]["next_eligible_date"].as_str().unwrap(),
        "2027-03-15"
    );
    assert!(body.get("depreciation_type").is_none());
}

#[tokio::test]
async fn test_processing_depreciates_from_stored_base() {
    let (status, body) = post_json(
        "/process",
        json!({
            "request": create_stored_request("2022-01-01", "2024-01-01", "82000", "approved"),
            "processed_on": "2024-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&body["reimbursement_amount"], "49200");
    assert_eq!(body["depreciation_type"].as_str().unwrap(), "yearly");
    assert_eq!(body["depreciation_value"].as_str().unwrap(), "40");
    assert_amount(&body["schedule"]["monthly_installment"], "2050");
}

#[tokio::test]
async fn test_processing_trues_up_final_installment() {
    let (status, body) = post_json(
        "/process",
        json!({
            "request": create_stored_request("2024-02-10", "2024-01-01", "50000", "approved"),
            "processed_on": "2024-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 50000 / 24 rounds to 2083; 23 x 2083 + 2091 = 50000
    assert_amount(&body["schedule"]["monthly_installment"], "2083");
    assert_amount(&body["schedule"]["final_installment"], "2091");
}

#[tokio::test]
async fn test_processing_in_december_rolls_into_january() {
    let (status, body) = post_json(
        "/process",
        json!({
            "request": create_stored_request("2024-02-10", "2024-01-01", "48000", "approved"),
            "processed_on": "2024-12-10"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"]["start_date"].as_str().unwrap(), "2025-01-01");
    assert_eq!(body["schedule"]["end_date"].as_str().unwrap(), "2026-12-31");
    assert_eq!(
        body["schedule"]["next_eligible_date"].as_str().unwrap(),
        "2027-12-10"
    );
}

#[tokio::test]
async fn test_processing_audit_trace_sequences_rules() {
    let (status, body) = post_json(
        "/process",
        json!({
            "request": create_stored_request("2022-01-01", "2024-01-01", "82000", "approved"),
            "processed_on": "2024-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps
        .iter()
        .map(|s| s["rule_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        rule_ids,
        vec!["age_depreciation", "installment_schedule", "reeligibility_window"]
    );
}

#[tokio::test]
async fn test_processing_an_already_processed_request_conflicts() {
    let mut stored = create_stored_request("2024-02-10", "2024-01-01", "48000", "processed");
    stored["processed_at"] = json!("2024-03-15");

    let (status, body) = post_json(
        "/process",
        json!({
            "request": stored,
            "processed_on": "2024-06-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"].as_str().unwrap(), "ALREADY_PROCESSED");
    assert!(body["message"].as_str().unwrap().contains("req_001"));
}

#[tokio::test]
async fn test_processing_a_paid_request_conflicts() {
    let (status, body) = post_json(
        "/process",
        json!({
            "request": create_stored_request("2024-02-10", "2024-01-01", "48000", "paid"),
            "processed_on": "2024-06-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"].as_str().unwrap(), "ALREADY_PROCESSED");
}

// =============================================================================
// Eligibility
// =============================================================================

#[tokio::test]
async fn test_short_tenure_is_ineligible_until_day_fifteen() {
    let (status, body) = post_json(
        "/eligibility",
        json!({
            "employee_id": "EMP003",
            "joining_date": "2024-06-10",
            "as_of": "2024-06-20"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], json!(false));
    assert_eq!(
        body["next_eligible_date"].as_str().unwrap(),
        "2024-06-25"
    );
    assert!(body["reason"].as_str().unwrap().contains("15 days"));
}

#[tokio::test]
async fn test_active_cooldown_is_ineligible() {
    let mut processed = create_stored_request("2023-02-01", "2023-01-01", "48000", "processed");
    processed["processed_at"] = json!("2024-03-15");
    processed["next_eligible_date"] = json!("2027-03-15");

    let (status, body) = post_json(
        "/eligibility",
        json!({
            "employee_id": "EMP003",
            "joining_date": "2023-01-01",
            "prior_requests": [processed],
            "as_of": "2026-01-10"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], json!(false));
    assert_eq!(
        body["next_eligible_date"].as_str().unwrap(),
        "2027-03-15"
    );
}

#[tokio::test]
async fn test_elapsed_cooldown_is_eligible() {
    let mut processed = create_stored_request("2023-02-01", "2023-01-01", "48000", "processed");
    processed["processed_at"] = json!("2024-03-15");
    processed["next_eligible_date"] = json!("2027-03-15");

    let (status, body) = post_json(
        "/eligibility",
        json!({
            "employee_id": "EMP003",
            "joining_date": "2023-01-01",
            "prior_requests": [processed],
            "as_of": "2027-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], json!(true));
}

#[tokio::test]
async fn test_rejected_history_does_not_block_eligibility() {
    let mut rejected = create_stored_request("2023-02-01", "2023-01-01", "48000", "rejected");
    rejected["next_eligible_date"] = json!("2027-03-15");

    let (status, body) = post_json(
        "/eligibility",
        json!({
            "employee_id": "EMP003",
            "joining_date": "2023-01-01",
            "prior_requests": [rejected],
            "as_of": "2026-01-10"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], json!(true));
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_negative_invoice_amount_is_rejected() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2024-02-10", "Developer", "-100"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"].as_str().unwrap(), "INVALID_AMOUNT");
    assert!(body["message"].as_str().unwrap().contains("invoice_amount"));
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("2024-01-01", "2024-02-10", "Contractor", "100000"),
    )
    .await;

    // Unknown enum variant fails deserialization before the cap lookup
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Contractor"));
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let (status, body) = post_json(
        "/quote",
        json!({
            "employee_id": "EMP003",
            "joining_date": "2024-01-01",
            "category": "Developer",
            "invoice_amount": "100000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"].as_str().unwrap(), "VALIDATION_ERROR");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("laptop_purchase_date")
    );
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let (status, body) = post_json(
        "/quote",
        create_quote_request("01/15/2024", "2024-02-10", "Developer", "100000"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("01/15/2024"));
}

#[tokio::test]
async fn test_syntactically_invalid_json_is_rejected() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/quote")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"employee_id\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"].as_str().unwrap(), "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/quote")
                .body(Body::from(
                    create_quote_request("2024-01-01", "2024-02-10", "Developer", "100000")
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"].as_str().unwrap(), "MISSING_CONTENT_TYPE");
}
