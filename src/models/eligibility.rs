//! Eligibility decision model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The outcome of an eligibility check for a new reimbursement request.
///
/// Produced by the pure decision function over caller-supplied history;
/// the engine records no state when deciding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    /// True if the employee may submit a new request now.
    pub eligible: bool,
    /// The earliest date a new request may be submitted, when ineligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
    /// Human-readable explanation, when ineligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EligibilityDecision {
    /// An unconditional eligible decision.
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            next_eligible_date: None,
            reason: None,
        }
    }

    /// An ineligible decision with the earliest re-application date.
    pub fn ineligible(next_eligible_date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            next_eligible_date: Some(next_eligible_date),
            reason: Some(reason.into()),
        }
    }
}
