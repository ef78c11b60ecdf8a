//! Base reimbursement calculation functionality.
//!
//! This module provides the function for determining the eligible base
//! reimbursement from the invoice total, the reimbursement share, and the
//! category cap.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Category};

/// The result of a base reimbursement calculation, including the amount
/// and audit step.
#[derive(Debug, Clone)]
pub struct BaseReimbursementResult {
    /// The base eligible reimbursement amount.
    pub amount: Decimal,
    /// True if the category cap limited the amount.
    pub capped: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the base eligible reimbursement for an invoice.
///
/// The reimbursement is the policy share (75%) of the invoice total,
/// limited by the cap for the employee's category. Any Windows Pro
/// upgrade amount is added to the invoice total before the cap applies.
/// The result is rounded to the nearest whole currency unit.
///
/// # Arguments
///
/// * `invoice_amount` - The amount on the purchase invoice (non-negative)
/// * `windows_pro_amount` - Additional amount for an OS upgrade (non-negative)
/// * `category` - The reimbursement category for the cap lookup
/// * `config` - The policy configuration containing share and caps
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `BaseReimbursementResult` containing the amount and an audit
/// step, or an error if:
/// - Either amount is negative (`InvalidAmount`)
/// - The category has no configured cap (`CategoryNotFound`)
///
/// # Policy Reference
///
/// Clause 3.1 of the Laptop Reimbursement Policy defines the 75% share;
/// clause 3.2 defines the category caps.
pub fn compute_base_reimbursement(
    invoice_amount: Decimal,
    windows_pro_amount: Decimal,
    category: Category,
    config: &PolicyConfig,
    step_number: u32,
) -> EngineResult<BaseReimbursementResult> {
    if invoice_amount.is_sign_negative() {
        return Err(EngineError::InvalidAmount {
            field: "invoice_amount".to_string(),
            message: format!("must not be negative, got {}", invoice_amount),
        });
    }
    if windows_pro_amount.is_sign_negative() {
        return Err(EngineError::InvalidAmount {
            field: "windows_pro_amount".to_string(),
            message: format!("must not be negative, got {}", windows_pro_amount),
        });
    }

    let rule = config.category_rule(category)?;
    let share = config.terms().reimbursement.share;

    let invoice_total = invoice_amount + windows_pro_amount;
    let uncapped = invoice_total * share;
    let capped = uncapped > rule.cap;
    let amount = if capped {
        rule.cap
    } else {
        uncapped.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    };

    let reasoning = if capped {
        format!(
            "{} x {} = {} exceeds the {} cap of {}; capped",
            share.normalize(),
            invoice_total.normalize(),
            uncapped.normalize(),
            category.as_str(),
            rule.cap.normalize()
        )
    } else {
        format!(
            "{} x {} = {}, within the {} cap of {}",
            share.normalize(),
            invoice_total.normalize(),
            amount.normalize(),
            category.as_str(),
            rule.cap.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_reimbursement".to_string(),
        rule_name: "Base Reimbursement".to_string(),
        clause_ref: config.terms().reimbursement.clause.clone(),
        input: serde_json::json!({
            "invoice_amount": invoice_amount.normalize().to_string(),
            "windows_pro_amount": windows_pro_amount.normalize().to_string(),
            "category": category.as_str(),
            "share": share.normalize().to_string(),
            "cap": rule.cap.normalize().to_string(),
            "cap_clause": rule.clause,
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string(),
            "capped": capped,
        }),
        reasoning,
    };

    Ok(BaseReimbursementResult {
        amount,
        capped,
        audit_step,
    })
}
