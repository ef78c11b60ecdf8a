//! Configuration loading and management for the reimbursement engine.
//!
//! This module provides functionality to load the laptop reimbursement
//! policy from YAML files, including policy metadata, category caps, and
//! the depreciation/installment/eligibility terms.
//!
//! # Example
//!
//! ```no_run
//! use reimbursement_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/laptop_policy").unwrap();
//! println!("Loaded policy: {}", config.policy().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CategoriesConfig, CategoryRule, DepreciationTerms, EligibilityTerms, InstallmentTerms,
    PolicyConfig, PolicyMetadata, ReimbursementTerms, TermsConfig,
};
