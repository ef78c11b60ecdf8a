//! Configuration types for the laptop reimbursement policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::Category;

/// Metadata about the reimbursement policy.
///
/// Contains identifying information about the policy document the
/// engine's clause references point into.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyMetadata {
    /// The internal policy code (e.g., "LRP-2023").
    pub code: String,
    /// The human-readable name of the policy.
    pub name: String,
    /// The version or effective date of the policy.
    pub version: String,
    /// URL to the policy document on the intranet.
    pub source_url: String,
}

/// Cap rule for a reimbursement category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    /// A description of who falls under this category.
    pub description: String,
    /// The maximum reimbursement amount for this category.
    pub cap: Decimal,
    /// Reference to the policy clause defining this cap.
    pub clause: String,
}

/// Categories configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesConfig {
    /// Map of category name to cap rule.
    pub categories: HashMap<String, CategoryRule>,
}

/// Base reimbursement terms.
#[derive(Debug, Clone, Deserialize)]
pub struct ReimbursementTerms {
    /// Reference to the policy clause for the reimbursement share.
    pub clause: String,
    /// The fraction of the invoice total that is reimbursable (0.75).
    pub share: Decimal,
}

/// Age-based depreciation terms.
#[derive(Debug, Clone, Deserialize)]
pub struct DepreciationTerms {
    /// Reference to the policy clause for depreciation.
    pub clause: String,
    /// Straight-line annual depreciation rate (0.20).
    pub annual_rate: Decimal,
    /// The maximum total depreciation rate (0.80).
    pub max_rate: Decimal,
    /// Days per month used to convert the purchase-to-joining gap into
    /// whole months (30).
    pub month_length_days: Decimal,
    /// Maximum number of entries in the monthly breakdown (48).
    pub breakdown_months_cap: u32,
}

/// Installment recovery terms.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallmentTerms {
    /// Reference to the policy clause for installment recovery.
    pub clause: String,
    /// The number of equal monthly parts (24).
    pub months: u32,
}

/// Eligibility terms.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityTerms {
    /// Reference to the policy clause for the tenure gate.
    pub min_tenure_clause: String,
    /// Days of service required before a first request (15).
    pub min_tenure_days: i64,
    /// Reference to the policy clause for the re-application cooldown.
    pub cooldown_clause: String,
    /// Calendar months between a processed request and re-eligibility (36).
    pub cooldown_months: u32,
}

/// The terms section loaded from terms.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct TermsConfig {
    /// Base reimbursement terms.
    pub reimbursement: ReimbursementTerms,
    /// Depreciation terms.
    pub depreciation: DepreciationTerms,
    /// Installment recovery terms.
    pub installments: InstallmentTerms,
    /// Eligibility terms.
    pub eligibility: EligibilityTerms,
}

/// The complete policy configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a policy configuration directory.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Policy metadata.
    metadata: PolicyMetadata,
    /// Cap rules by category name.
    categories: HashMap<String, CategoryRule>,
    /// Reimbursement, depreciation, installment, and eligibility terms.
    terms: TermsConfig,
}

impl PolicyConfig {
    /// Creates a new PolicyConfig from its component parts.
    pub fn new(
        metadata: PolicyMetadata,
        categories: HashMap<String, CategoryRule>,
        terms: TermsConfig,
    ) -> Self {
        Self {
            metadata,
            categories,
            terms,
        }
    }

    /// Returns the policy metadata.
    pub fn policy(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns all category cap rules.
    pub fn categories(&self) -> &HashMap<String, CategoryRule> {
        &self.categories
    }

    /// Returns the policy terms.
    pub fn terms(&self) -> &TermsConfig {
        &self.terms
    }

    /// Looks up the cap rule for a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` if the policy configuration has no cap
    /// for the category. Unknown categories are never silently defaulted.
    pub fn category_rule(&self, category: Category) -> EngineResult<&CategoryRule> {
        self.categories
            .get(category.as_str())
            .ok_or_else(|| EngineError::CategoryNotFound {
                category: category.as_str().to_string(),
            })
    }
}
