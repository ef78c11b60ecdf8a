//! Age-based depreciation calculation functionality.
//!
//! This module provides the function for depreciating a reimbursement
//! amount when the device was purchased before the employee's joining
//! date, using straight-line yearly depreciation applied per whole month
//! of age.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DepreciationTerms;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, DepreciationResult, MonthlyDepreciationEntry};

/// Months in a policy year, used to derive the monthly rate from the
/// annual rate.
const MONTHS_PER_YEAR: u32 = 12;

/// The result of a depreciation calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct DepreciationCalculation {
    /// The computed depreciation result.
    pub result: DepreciationResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates age-based depreciation for a reimbursement amount.
///
/// Depreciation applies only when the device was purchased at least one
/// whole month before the joining date. The age in whole months uses the
/// month length from the policy terms (30 days); a gap of a
/// few days short of a month deliberately yields no depreciation, the
/// same as a purchase on or after the joining date.
///
/// The total rate is `months_old x (annual_rate / 12)`, never more than
/// the policy maximum (80%), and the depreciated amount never falls below
/// the residual floor (20% of the original amount).
///
/// # Arguments
///
/// * `purchase_date` - The calendar date the device was bought
/// * `joining_date` - The date the employee joined the organization
/// * `original_amount` - The amount to depreciate (non-negative)
/// * `include_monthly_breakdown` - Whether to produce the informational
///   month-by-month breakdown (at most 48 entries)
/// * `terms` - The depreciation terms from the policy configuration
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `DepreciationCalculation` containing the result and an audit
/// step, or `InvalidAmount` if the amount is negative.
///
/// # Policy Reference
///
/// Clause 4.1 of the Laptop Reimbursement Policy defines the 20% yearly
/// rate; clause 4.2 defines the 80% maximum and the residual floor.
///
/// # Examples
///
/// ```
/// use reimbursement_engine::calculation::calculate_depreciation;
/// use reimbursement_engine::config::DepreciationTerms;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let terms = DepreciationTerms {
///     clause: "4.1".to_string(),
///     annual_rate: Decimal::from_str("0.20").unwrap(),
///     max_rate: Decimal::from_str("0.80").unwrap(),
///     month_length_days: Decimal::from_str("30").unwrap(),
///     breakdown_months_cap: 48,
/// };
///
/// let calc = calculate_depreciation(
///     NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     Decimal::from_str("82000").unwrap(),
///     false,
///     &terms,
///     1,
/// ).unwrap();
///
/// assert_eq!(calc.result.months_old, 24);
/// assert_eq!(calc.result.depreciation_percentage, 40);
/// assert_eq!(calc.result.depreciated_amount, Decimal::from_str("49200").unwrap());
/// ```
pub fn calculate_depreciation(
    purchase_date: NaiveDate,
    joining_date: NaiveDate,
    original_amount: Decimal,
    include_monthly_breakdown: bool,
    terms: &DepreciationTerms,
    step_number: u32,
) -> EngineResult<DepreciationCalculation> {
    if original_amount.is_sign_negative() {
        return Err(EngineError::InvalidAmount {
            field: "original_amount".to_string(),
            message: format!("must not be negative, got {}", original_amount),
        });
    }

    if purchase_date >= joining_date {
        return Ok(no_depreciation(
            purchase_date,
            joining_date,
            original_amount,
            terms,
            step_number,
            "No depreciation - device purchased on or after the joining date",
        ));
    }

    let days_old = (joining_date - purchase_date).num_days();
    let months_old = (Decimal::from(days_old) / terms.month_length_days)
        .floor()
        .to_u32()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("device age of {} days does not fit in whole months", days_old),
        })?;

    if months_old == 0 {
        return Ok(no_depreciation(
            purchase_date,
            joining_date,
            original_amount,
            terms,
            step_number,
            "No depreciation - purchase precedes joining by less than one whole month",
        ));
    }

    let monthly_rate = terms.annual_rate / Decimal::from(MONTHS_PER_YEAR);
    let uncapped_rate =
        Decimal::from(months_old) * terms.annual_rate / Decimal::from(MONTHS_PER_YEAR);
    let total_rate = uncapped_rate.min(terms.max_rate);

    let depreciation_percentage = (total_rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("depreciation rate {} is not a valid percentage", total_rate),
        })?;

    let residual_floor = original_amount * (Decimal::ONE - terms.max_rate);
    let rounded = (original_amount * (Decimal::ONE - total_rate))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let depreciated_amount = rounded.max(residual_floor);

    let monthly_breakdown = if include_monthly_breakdown {
        build_monthly_breakdown(original_amount, monthly_rate, residual_floor, months_old, terms)
    } else {
        Vec::new()
    };

    let result = DepreciationResult {
        depreciated_amount,
        depreciation_applied: true,
        months_old,
        depreciation_percentage,
        monthly_breakdown,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "age_depreciation".to_string(),
        rule_name: "Age-Based Depreciation".to_string(),
        clause_ref: terms.clause.clone(),
        input: serde_json::json!({
            "purchase_date": purchase_date.to_string(),
            "joining_date": joining_date.to_string(),
            "original_amount": original_amount.normalize().to_string(),
        }),
        output: serde_json::json!({
            "depreciated_amount": depreciated_amount.normalize().to_string(),
            "depreciation_applied": true,
            "months_old": months_old,
            "depreciation_percentage": depreciation_percentage,
        }),
        reasoning: format!(
            "{} whole months at {}%/year = {}% depreciation: {} -> {}",
            months_old,
            (terms.annual_rate * Decimal::ONE_HUNDRED).normalize(),
            depreciation_percentage,
            original_amount.normalize(),
            depreciated_amount.normalize()
        ),
    };

    Ok(DepreciationCalculation { result, audit_step })
}

/// Builds the no-depreciation result shared by the on-or-after-joining
/// and sub-month cases.
fn no_depreciation(
    purchase_date: NaiveDate,
    joining_date: NaiveDate,
    original_amount: Decimal,
    terms: &DepreciationTerms,
    step_number: u32,
    reasoning: &str,
) -> DepreciationCalculation {
    let result = DepreciationResult {
        depreciated_amount: original_amount,
        depreciation_applied: false,
        months_old: 0,
        depreciation_percentage: 0,
        monthly_breakdown: Vec::new(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "age_depreciation".to_string(),
        rule_name: "Age-Based Depreciation".to_string(),
        clause_ref: terms.clause.clone(),
        input: serde_json::json!({
            "purchase_date": purchase_date.to_string(),
            "joining_date": joining_date.to_string(),
            "original_amount": original_amount.normalize().to_string(),
        }),
        output: serde_json::json!({
            "depreciated_amount": original_amount.normalize().to_string(),
            "depreciation_applied": false,
            "months_old": 0,
            "depreciation_percentage": 0,
        }),
        reasoning: reasoning.to_string(),
    };

    DepreciationCalculation { result, audit_step }
}

/// Produces the informational month-by-month breakdown.
///
/// A running value is reduced by the monthly rate each step and floored
/// at the residual, the same floor the headline amount uses. Values are
/// rounded to two places for display.
fn build_monthly_breakdown(
    original_amount: Decimal,
    monthly_rate: Decimal,
    residual_floor: Decimal,
    months_old: u32,
    terms: &DepreciationTerms,
) -> Vec<MonthlyDepreciationEntry> {
    let months = months_old.min(terms.breakdown_months_cap);
    let mut entries = Vec::with_capacity(months as usize);
    let mut running = original_amount;

    for month in 1..=months {
        let mut depreciation = running * monthly_rate;
        let mut closing = running - depreciation;
        if closing < residual_floor {
            closing = residual_floor;
            depreciation = running - closing;
        }

        entries.push(MonthlyDepreciationEntry {
            month,
            label: format!("Month {}", month),
            depreciation: depreciation.round_dp(2),
            closing_value: closing.round_dp(2),
        });

        running = closing;
    }

    entries
}
