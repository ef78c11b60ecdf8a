//! Depreciation result models.
//!
//! This module contains the [`DepreciationResult`] type produced by the
//! age-based depreciation calculation, and the informational monthly
//! breakdown entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of an age-based depreciation calculation.
///
/// Depreciation applies only when the device was purchased at least one
/// whole month before the employee's joining date. The depreciated amount
/// never falls below 20% of the pre-depreciation amount.
///
/// # Example
///
/// ```
/// use reimbursement_engine::models::DepreciationResult;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = DepreciationResult {
///     depreciated_amount: Decimal::from_str("49200").unwrap(),
///     depreciation_applied: true,
///     months_old: 24,
///     depreciation_percentage: 40,
///     monthly_breakdown: vec![],
/// };
/// assert!(result.depreciation_percentage <= 80);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationResult {
    /// The reimbursement amount after depreciation.
    pub depreciated_amount: Decimal,
    /// True only if the purchase date precedes the joining date by at
    /// least one whole month.
    pub depreciation_applied: bool,
    /// Whole months between purchase date and joining date.
    pub months_old: u32,
    /// The total depreciation applied, as an integer percentage (at most 80).
    pub depreciation_percentage: u32,
    /// Optional month-by-month breakdown, produced only on request.
    /// Informational/display-only; no other computation consumes it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monthly_breakdown: Vec<MonthlyDepreciationEntry>,
}

/// A single month in the informational depreciation breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyDepreciationEntry {
    /// One-based month index from the purchase date.
    pub month: u32,
    /// Display label for the month (e.g. "Month 7").
    pub label: String,
    /// The value depreciated during this month.
    pub depreciation: Decimal,
    /// The running value at the end of this month.
    pub closing_value: Decimal,
}
