//! Reimbursement request model and related types.
//!
//! This module defines the ReimbursementRequest struct along with the
//! Category and RequestStatus enums used throughout the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the reimbursement category of the requesting employee.
///
/// The category determines which cap applies to the reimbursement amount.
/// The wire names match the policy document exactly: `"Developer"` and
/// `"Non-Developer"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Engineering roles issued development-grade hardware.
    Developer,
    /// All other roles.
    #[serde(rename = "Non-Developer")]
    NonDeveloper,
}

impl Category {
    /// Returns the policy name of the category, as used in configuration
    /// lookups and audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Developer => "Developer",
            Category::NonDeveloper => "Non-Developer",
        }
    }
}

/// Represents the workflow status of a reimbursement request.
///
/// The status lifecycle is owned by the external workflow:
/// `pending -> approved -> processed -> paid`, or `pending -> rejected`.
/// The engine reacts only to the transition into `processed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted and awaiting IT admin review.
    Pending,
    /// Approved by IT admin, awaiting finance processing.
    Approved,
    /// Rejected by IT admin (terminal).
    Rejected,
    /// Processed by finance; installment schedule has been computed.
    Processed,
    /// Installments fully paid out.
    Paid,
}

/// The calculation-relevant subset of a stored reimbursement request.
///
/// The engine does not own persistence; callers supply this value object
/// and persist whatever the engine returns. The optional depreciation and
/// schedule fields are flattened onto the record at processing time, the
/// way the surrounding workflow stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReimbursementRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// Identifier of the employee who submitted the request.
    pub employee_id: String,
    /// The date the employee joined the organization.
    pub joining_date: NaiveDate,
    /// The calendar date the laptop was purchased.
    pub laptop_purchase_date: NaiveDate,
    /// The reimbursement category of the employee.
    pub category: Category,
    /// The amount on the purchase invoice (non-negative).
    pub invoice_amount: Decimal,
    /// Additional invoice amount for a Windows Pro upgrade, added to the
    /// invoice total before the cap is applied.
    #[serde(default)]
    pub windows_pro_amount: Option<Decimal>,
    /// The invoice-derived base reimbursement, set once at submission and
    /// never mutated afterwards. Depreciation at processing time always
    /// starts from this field.
    pub base_reimbursement_amount: Decimal,
    /// The amount currently owed to the employee. Equal to the base at
    /// submission; replaced by the depreciated amount at processing time.
    pub reimbursement_amount: Decimal,
    /// The workflow status of the request.
    pub status: RequestStatus,
    /// The date the request was processed by finance, if it has been.
    #[serde(default)]
    pub processed_at: Option<NaiveDate>,
    /// The kind of depreciation applied at processing time (`"yearly"`).
    #[serde(default)]
    pub depreciation_type: Option<String>,
    /// The depreciation percentage applied, rendered as a string.
    #[serde(default)]
    pub depreciation_value: Option<String>,
    /// The monthly installment amount, set at processing time.
    #[serde(default)]
    pub monthly_installment: Option<Decimal>,
    /// First day of the installment window, set at processing time.
    #[serde(default)]
    pub installment_start_date: Option<NaiveDate>,
    /// Last day of the installment window, set at processing time.
    #[serde(default)]
    pub installment_end_date: Option<NaiveDate>,
    /// The earliest date a new request may be submitted, set at
    /// processing time.
    #[serde(default)]
    pub next_eligible_date: Option<NaiveDate>,
}

impl ReimbursementRequest {
    /// Returns true if the request has already been processed by finance.
    ///
    /// A `paid` request was necessarily processed first, so both statuses
    /// count as settled for the reprocessing guard.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, RequestStatus::Processed | RequestStatus::Paid)
    }

    /// Returns the invoice total including any Windows Pro amount.
    pub fn invoice_total(&self) -> Decimal {
        self.invoice_amount + self.windows_pro_amount.unwrap_or(Decimal::ZERO)
    }
}
