//! Quote result and audit trail models.
//!
//! This module contains the [`QuoteResult`] type returned by the quote
//! surface, together with the audit structures that record every rule
//! decision the engine makes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, DepreciationResult};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule
/// application, with a reference into the Laptop Reimbursement Policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the policy clause for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation but may
/// require attention, such as the sub-month age gap that suppresses
/// depreciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// Records every decision made during the calculation process for
/// transparency toward the finance reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The result of a reimbursement quote.
///
/// A quote combines the base reimbursement (invoice total, share, cap)
/// with a depreciation preview for the supplied purchase and joining
/// dates. The final amount is what finance would pay out if the request
/// were processed as quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Unique identifier for this quote.
    pub quote_id: Uuid,
    /// When the quote was produced.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the quote.
    pub engine_version: String,
    /// The employee the quote is for.
    pub employee_id: String,
    /// The reimbursement category used for the cap lookup.
    pub category: Category,
    /// The invoice total, including any Windows Pro amount.
    pub invoice_total: Decimal,
    /// The base reimbursement before depreciation.
    pub base_amount: Decimal,
    /// True if the category cap limited the base amount.
    pub capped: bool,
    /// The depreciation preview for the supplied dates.
    pub depreciation: DepreciationResult,
    /// The final reimbursement amount after depreciation.
    pub final_amount: Decimal,
    /// The audit trace for the quote.
    pub audit_trace: AuditTrace,
}
