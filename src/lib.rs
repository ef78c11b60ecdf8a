//! Calculation engine for the employee laptop reimbursement program.
//!
//! This crate implements the reimbursement rules of the internal Laptop
//! Reimbursement Policy (LRP-2023): base reimbursement with category caps,
//! age-based depreciation for devices purchased before the employee's
//! joining date, installment schedules for processed requests, and
//! eligibility checks.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
