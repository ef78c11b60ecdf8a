//! Eligibility check functionality.
//!
//! This module provides the pure decision function that determines
//! whether an employee may submit a new reimbursement request: a minimum
//! tenure gate, then a re-application cooldown derived from the latest
//! processed request in the caller-supplied history.

use chrono::{Duration, NaiveDate};

use crate::config::PolicyConfig;
use crate::models::{AuditStep, EligibilityDecision, ReimbursementRequest, RequestStatus};

/// The result of an eligibility check, including the audit step.
#[derive(Debug, Clone)]
pub struct EligibilityCheckResult {
    /// The eligibility decision.
    pub decision: EligibilityDecision,
    /// The audit step recording this check.
    pub audit_step: AuditStep,
}

/// Checks whether an employee may submit a new reimbursement request.
///
/// Two rules apply, in order:
///
/// 1. **Tenure gate**: fewer than 15 days of service makes the employee
///    ineligible until `joining_date + 15 days`.
/// 2. **Re-application cooldown**: among the employee's `processed`
///    requests, the one with the latest `processed_at` sets the earliest
///    date a new request may be submitted; before that date the employee
///    is ineligible.
///
/// The function is a pure decision over the caller-supplied history; it
/// records nothing and cannot fail.
///
/// # Arguments
///
/// * `joining_date` - The date the employee joined the organization
/// * `prior_requests` - The employee's prior requests (any statuses)
/// * `now` - The date to decide for
/// * `config` - The policy configuration
/// * `step_number` - The step number for audit trail sequencing
///
/// # Policy Reference
///
/// Clause 6.1 of the Laptop Reimbursement Policy defines the tenure
/// gate; clause 6.2 defines the re-application window.
pub fn check_eligibility(
    joining_date: NaiveDate,
    prior_requests: &[ReimbursementRequest],
    now: NaiveDate,
    config: &PolicyConfig,
    step_number: u32,
) -> EligibilityCheckResult {
    let terms = &config.terms().eligibility;

    let days_of_service = (now - joining_date).num_days();
    if days_of_service < terms.min_tenure_days {
        let next_eligible = joining_date + Duration::days(terms.min_tenure_days);
        let reason = format!(
            "You need to complete {} days of service before applying. You can apply from {}.",
            terms.min_tenure_days, next_eligible
        );

        let audit_step = AuditStep {
            step_number,
            rule_id: "eligibility_check".to_string(),
            rule_name: "Eligibility Check".to_string(),
            clause_ref: terms.min_tenure_clause.clone(),
            input: serde_json::json!({
                "joining_date": joining_date.to_string(),
                "as_of": now.to_string(),
                "days_of_service": days_of_service,
            }),
            output: serde_json::json!({
                "eligible": false,
                "next_eligible_date": next_eligible.to_string(),
            }),
            reasoning: format!(
                "{} days of service is below the {}-day minimum",
                days_of_service, terms.min_tenure_days
            ),
        };

        return EligibilityCheckResult {
            decision: EligibilityDecision::ineligible(next_eligible, reason),
            audit_step,
        };
    }

    // Latest processed request drives the cooldown; requests in other
    // statuses never carry a next_eligible_date the engine produced.
    let latest_processed = prior_requests
        .iter()
        .filter(|r| r.status == RequestStatus::Processed)
        .max_by_key(|r| r.processed_at);

    if let Some(request) = latest_processed {
        if let Some(next_eligible) = request.next_eligible_date {
            if now < next_eligible {
                let reason = format!(
                    "You can apply for your next reimbursement after {}.",
                    next_eligible
                );

                let audit_step = AuditStep {
                    step_number,
                    rule_id: "eligibility_check".to_string(),
                    rule_name: "Eligibility Check".to_string(),
                    clause_ref: terms.cooldown_clause.clone(),
                    input: serde_json::json!({
                        "joining_date": joining_date.to_string(),
                        "as_of": now.to_string(),
                        "latest_processed_request": request.id,
                        "processed_at": request.processed_at.map(|d| d.to_string()),
                    }),
                    output: serde_json::json!({
                        "eligible": false,
                        "next_eligible_date": next_eligible.to_string(),
                    }),
                    reasoning: format!(
                        "Cooldown from request '{}' runs until {}",
                        request.id, next_eligible
                    ),
                };

                return EligibilityCheckResult {
                    decision: EligibilityDecision::ineligible(next_eligible, reason),
                    audit_step,
                };
            }
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "eligibility_check".to_string(),
        rule_name: "Eligibility Check".to_string(),
        clause_ref: terms.cooldown_clause.clone(),
        input: serde_json::json!({
            "joining_date": joining_date.to_string(),
            "as_of": now.to_string(),
            "days_of_service": days_of_service,
            "prior_requests": prior_requests.len(),
        }),
        output: serde_json::json!({
            "eligible": true,
        }),
        reasoning: format!(
            "{} days of service and no active cooldown window",
            days_of_service
        ),
    };

    EligibilityCheckResult {
        decision: EligibilityDecision::eligible(),
        audit_step,
    }
}
