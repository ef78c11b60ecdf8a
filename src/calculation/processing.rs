//! Processing calculation functionality.
//!
//! This module computes the fields written onto a request when finance
//! marks it as processed: the final (depreciated) reimbursement amount,
//! the 24-month installment schedule, and the re-eligibility date.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, InstallmentSchedule, ProcessingOutcome, ReimbursementRequest};

use super::calculate_depreciation;

/// The result of a processing calculation, including the audit steps.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The computed processing outcome.
    pub outcome: ProcessingOutcome,
    /// The audit steps recording the depreciation, schedule, and
    /// cooldown decisions.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes the processing outcome for a request.
///
/// Depreciation is always derived from the request's stored
/// `base_reimbursement_amount`, never from the mutable
/// `reimbursement_amount`, so reprocessing can never compound it. A
/// request that is already `processed` or `paid` is rejected outright.
///
/// The reimbursement is recovered in equal monthly installments starting
/// on the first day of the month after `now`; the final installment is
/// adjusted so the parts sum exactly to the reimbursement amount. The
/// employee becomes eligible for a new request 36 calendar months after
/// `now` (the day-of-month is clamped for shorter months).
///
/// # Arguments
///
/// * `request` - The request being processed
/// * `now` - The processing date
/// * `config` - The policy configuration
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `ProcessingResult` with the outcome and audit steps, or an
/// error if:
/// - The request is already processed or paid (`AlreadyProcessed`)
/// - The stored base amount is negative (`InvalidAmount`)
/// - A schedule date overflows the calendar (`CalculationError`)
///
/// # Policy Reference
///
/// Clause 5.1 of the Laptop Reimbursement Policy defines the 24-month
/// recovery; clause 6.2 defines the 36-month re-application window.
pub fn apply_processing(
    request: &ReimbursementRequest,
    now: NaiveDate,
    config: &PolicyConfig,
    step_number: u32,
) -> EngineResult<ProcessingResult> {
    if request.is_settled() {
        return Err(EngineError::AlreadyProcessed {
            request_id: request.id.clone(),
        });
    }

    let terms = config.terms();
    let mut audit_steps = Vec::with_capacity(3);

    // Depreciate from the invoice-derived base, not the mutable amount.
    let depreciation = calculate_depreciation(
        request.laptop_purchase_date,
        request.joining_date,
        request.base_reimbursement_amount,
        false,
        &terms.depreciation,
        step_number,
    )?;
    audit_steps.push(depreciation.audit_step);

    let reimbursement_amount = depreciation.result.depreciated_amount;
    let (depreciation_type, depreciation_value) = if depreciation.result.depreciation_applied {
        (
            Some("yearly".to_string()),
            Some(depreciation.result.depreciation_percentage.to_string()),
        )
    } else {
        (None, None)
    };

    let months = terms.installments.months;
    let monthly_installment = (reimbursement_amount / Decimal::from(months))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // True-up: the final part absorbs the rounding remainder so the
    // schedule sums exactly to the reimbursement amount.
    let final_installment =
        reimbursement_amount - monthly_installment * Decimal::from(months - 1);

    let start_date = first_day_of_following_month(now)?;
    let final_month = start_date
        .checked_add_months(Months::new(months - 1))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("installment window starting {} overflowed the calendar", start_date),
        })?;
    let end_date = last_day_of_month(final_month)?;

    let next_eligible_date = now
        .checked_add_months(Months::new(terms.eligibility.cooldown_months))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("re-eligibility date after {} overflowed the calendar", now),
        })?;

    audit_steps.push(AuditStep {
        step_number: step_number + 1,
        rule_id: "installment_schedule".to_string(),
        rule_name: "Installment Schedule".to_string(),
        clause_ref: terms.installments.clause.clone(),
        input: serde_json::json!({
            "reimbursement_amount": reimbursement_amount.normalize().to_string(),
            "months": months,
            "processed_on": now.to_string(),
        }),
        output: serde_json::json!({
            "monthly_installment": monthly_installment.normalize().to_string(),
            "final_installment": final_installment.normalize().to_string(),
            "start_date": start_date.to_string(),
            "end_date": end_date.to_string(),
        }),
        reasoning: format!(
            "{} over {} months = {}/month from {} to {}",
            reimbursement_amount.normalize(),
            months,
            monthly_installment.normalize(),
            start_date,
            end_date
        ),
    });

    audit_steps.push(AuditStep {
        step_number: step_number + 2,
        rule_id: "reeligibility_window".to_string(),
        rule_name: "Re-Eligibility Window".to_string(),
        clause_ref: terms.eligibility.cooldown_clause.clone(),
        input: serde_json::json!({
            "processed_on": now.to_string(),
            "cooldown_months": terms.eligibility.cooldown_months,
        }),
        output: serde_json::json!({
            "next_eligible_date": next_eligible_date.to_string(),
        }),
        reasoning: format!(
            "Next request allowed {} months after processing: {}",
            terms.eligibility.cooldown_months, next_eligible_date
        ),
    });

    let outcome = ProcessingOutcome {
        request_id: request.id.clone(),
        processed_on: now,
        reimbursement_amount,
        depreciation: depreciation.result,
        depreciation_type,
        depreciation_value,
        schedule: InstallmentSchedule {
            months,
            monthly_installment,
            final_installment,
            start_date,
            end_date,
            next_eligible_date,
        },
    };

    Ok(ProcessingResult {
        outcome,
        audit_steps,
    })
}

/// Returns the first calendar day of the month following `date`.
fn first_day_of_following_month(date: NaiveDate) -> EngineResult<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| EngineError::CalculationError {
        message: format!("month after {} overflowed the calendar", date),
    })
}

/// Returns the last calendar day of the month containing `date`.
fn last_day_of_month(date: NaiveDate) -> EngineResult<NaiveDate> {
    first_day_of_following_month(date)?
        .pred_opt()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("last day of the month of {} overflowed the calendar", date),
        })
}
