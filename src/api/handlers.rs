//! HTTP request handlers for the reimbursement engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    apply_processing, calculate_depreciation, check_eligibility, compute_base_reimbursement,
};
use crate::config::PolicyConfig;
use crate::error::EngineError;
use crate::models::{
    AuditTrace, AuditWarning, ProcessingReceipt, QuoteResult, ReimbursementRequest,
};

use super::request::{EligibilityRequest, ProcessRequest, QuoteRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quote", post(quote_handler))
        .route("/process", post(process_handler))
        .route("/eligibility", post(eligibility_handler))
        .with_state(state)
}

/// Handler for POST /quote endpoint.
///
/// Accepts invoice inputs and returns the base reimbursement with a
/// depreciation preview.
async fn quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing quote request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection_to_error(correlation_id, rejection)),
    };

    match perform_quote(&request, state.config().config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                base_amount = %result.base_amount,
                final_amount = %result.final_amount,
                duration_us = result.audit_trace.duration_us,
                "Quote completed successfully"
            );
            json_ok(result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Quote failed"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for POST /process endpoint.
///
/// Applies processing to a supplied request record and returns the
/// receipt with the installment schedule.
async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing request transition");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection_to_error(correlation_id, rejection)),
    };

    let processed_on = request.processed_on.unwrap_or_else(|| Utc::now().date_naive());
    let domain_request: ReimbursementRequest = request.request.into();

    let start_time = Instant::now();
    match apply_processing(&domain_request, processed_on, state.config().config(), 1) {
        Ok(result) => {
            let receipt = ProcessingReceipt {
                calculation_id: Uuid::new_v4(),
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                outcome: result.outcome,
                audit_trace: AuditTrace {
                    steps: result.audit_steps,
                    warnings: Vec::new(),
                    duration_us: start_time.elapsed().as_micros() as u64,
                },
            };
            info!(
                correlation_id = %correlation_id,
                request_id = %receipt.outcome.request_id,
                reimbursement_amount = %receipt.outcome.reimbursement_amount,
                next_eligible_date = %receipt.outcome.schedule.next_eligible_date,
                "Processing completed successfully"
            );
            json_ok(receipt)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                request_id = %domain_request.id,
                error = %err,
                "Processing failed"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for POST /eligibility endpoint.
///
/// Decides whether the employee may submit a new request, based on the
/// tenure gate and the supplied request history.
async fn eligibility_handler(
    State(state): State<AppState>,
    payload: Result<Json<EligibilityRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing eligibility check");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection_to_error(correlation_id, rejection)),
    };

    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let history: Vec<ReimbursementRequest> =
        request.prior_requests.into_iter().map(Into::into).collect();

    let result = check_eligibility(
        request.joining_date,
        &history,
        as_of,
        state.config().config(),
        1,
    );

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        eligible = result.decision.eligible,
        reasoning = %result.audit_step.reasoning,
        "Eligibility check completed"
    );
    json_ok(result.decision)
}

/// Computes a quote: base reimbursement followed by a depreciation
/// preview of that base.
fn perform_quote(
    request: &QuoteRequest,
    config: &PolicyConfig,
) -> Result<QuoteResult, EngineError> {
    let start_time = Instant::now();
    let mut steps = Vec::with_capacity(2);
    let mut warnings = Vec::new();

    let windows_pro_amount = request.windows_pro_amount.unwrap_or(Decimal::ZERO);
    let base = compute_base_reimbursement(
        request.invoice_amount,
        windows_pro_amount,
        request.category,
        config,
        1,
    )?;
    steps.push(base.audit_step);

    let depreciation = calculate_depreciation(
        request.laptop_purchase_date,
        request.joining_date,
        base.amount,
        request.include_monthly_breakdown,
        &config.terms().depreciation,
        2,
    )?;
    steps.push(depreciation.audit_step);

    // The sub-month threshold suppresses depreciation even though the
    // device predates joining; surface that to reviewers as a warning.
    if request.laptop_purchase_date < request.joining_date
        && !depreciation.result.depreciation_applied
    {
        let gap_days = (request.joining_date - request.laptop_purchase_date).num_days();
        warnings.push(AuditWarning {
            code: "SUB_MONTH_AGE_GAP".to_string(),
            message: format!(
                "Device purchased {} days before joining; below one whole month, no depreciation applied",
                gap_days
            ),
            severity: "low".to_string(),
        });
    }

    Ok(QuoteResult {
        quote_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: request.employee_id.clone(),
        category: request.category,
        invoice_total: request.invoice_amount + windows_pro_amount,
        base_amount: base.amount,
        capped: base.capped,
        final_amount: depreciation.result.depreciated_amount,
        depreciation: depreciation.result,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}

/// Maps a JSON extraction failure onto the API error body.
fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Check if it's a missing field error
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    }
}

fn json_ok<T: Serialize>(value: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(value),
    )
        .into_response()
}

fn bad_request(error: ApiError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn engine_error_response(error: EngineError) -> Response {
    let api_error: ApiErrorResponse = error.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}
