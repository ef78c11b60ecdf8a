//! Core data models for the reimbursement calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod depreciation;
mod eligibility;
mod quote;
mod request;
mod schedule;

pub use depreciation::{DepreciationResult, MonthlyDepreciationEntry};
pub use eligibility::EligibilityDecision;
pub use quote::{AuditStep, AuditTrace, AuditWarning, QuoteResult};
pub use request::{Category, ReimbursementRequest, RequestStatus};
pub use schedule::{InstallmentSchedule, ProcessingOutcome, ProcessingReceipt};
