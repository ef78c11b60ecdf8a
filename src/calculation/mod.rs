//! Calculation logic for the reimbursement engine.
//!
//! This module contains all the calculation functions for determining
//! reimbursement amounts, including base reimbursement with category caps,
//! age-based depreciation for devices purchased before the joining date,
//! installment schedule generation at processing time, and eligibility
//! checks for new requests.

mod base_reimbursement;
mod depreciation;
mod eligibility;
mod processing;

pub use base_reimbursement::{BaseReimbursementResult, compute_base_reimbursement};
pub use depreciation::{DepreciationCalculation, calculate_depreciation};
pub use eligibility::{EligibilityCheckResult, check_eligibility};
pub use processing::{ProcessingResult, apply_processing};
