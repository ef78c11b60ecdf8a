//! Installment schedule and processing outcome models.
//!
//! When finance marks a request as processed, the engine computes the
//! final reimbursement amount and a 24-month recovery schedule. These
//! types capture that output; the caller flattens them back onto the
//! stored request record.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, DepreciationResult};

/// The installment schedule for a processed reimbursement.
///
/// The reimbursement is recovered in equal monthly parts, with the last
/// part adjusted so the schedule sums exactly to the reimbursement amount.
///
/// # Example
///
/// ```
/// use reimbursement_engine::models::InstallmentSchedule;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let schedule = InstallmentSchedule {
///     months: 24,
///     monthly_installment: Decimal::from_str("2000").unwrap(),
///     final_installment: Decimal::from_str("2000").unwrap(),
///     start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
///     next_eligible_date: NaiveDate::from_ymd_opt(2027, 3, 15).unwrap(),
/// };
/// assert_eq!(schedule.total(), Decimal::from_str("48000").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    /// The number of monthly parts.
    pub months: u32,
    /// The rounded monthly installment amount.
    pub monthly_installment: Decimal,
    /// The last installment, adjusted so the parts sum exactly to the
    /// reimbursement amount.
    pub final_installment: Decimal,
    /// First calendar day of the month following processing.
    pub start_date: NaiveDate,
    /// Last calendar day of the final installment month.
    pub end_date: NaiveDate,
    /// The earliest date a new request from the same employee may be
    /// submitted.
    pub next_eligible_date: NaiveDate,
}

impl InstallmentSchedule {
    /// Returns the sum of all installments in the schedule.
    pub fn total(&self) -> Decimal {
        self.monthly_installment * Decimal::from(self.months - 1) + self.final_installment
    }
}

/// The fields computed when a request transitions into `processed`.
///
/// Callers merge these onto the stored request record: the reimbursement
/// amount is replaced by the depreciated amount, and the depreciation and
/// schedule fields are flattened alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    /// The ID of the processed request.
    pub request_id: String,
    /// The date processing took effect.
    pub processed_on: NaiveDate,
    /// The final reimbursement amount (the depreciated base).
    pub reimbursement_amount: Decimal,
    /// The depreciation details behind the final amount.
    pub depreciation: DepreciationResult,
    /// `"yearly"` when depreciation applied; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_type: Option<String>,
    /// The applied percentage as a string, when depreciation applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_value: Option<String>,
    /// The installment schedule for recovering the reimbursement.
    pub schedule: InstallmentSchedule,
}

/// The full response for a processing call, wrapping the outcome with
/// identification and the audit trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReceipt {
    /// Unique identifier for this processing calculation.
    pub calculation_id: Uuid,
    /// When the calculation ran.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the receipt.
    pub engine_version: String,
    /// The computed processing outcome.
    #[serde(flatten)]
    pub outcome: ProcessingOutcome,
    /// The audit trace for the processing calculation.
    pub audit_trace: AuditTrace,
}
