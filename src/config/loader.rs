//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the laptop
//! reimbursement policy from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Category;

use super::types::{CategoriesConfig, CategoryRule, PolicyConfig, PolicyMetadata, TermsConfig};

/// Loads and provides access to the reimbursement policy configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query category caps and policy terms.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/laptop_policy/
/// ├── policy.yaml      # Policy metadata
/// ├── categories.yaml  # Per-category reimbursement caps
/// └── terms.yaml       # Share, depreciation, installment, eligibility terms
/// ```
///
/// # Example
///
/// ```no_run
/// use reimbursement_engine::config::ConfigLoader;
/// use reimbursement_engine::models::Category;
///
/// let loader = ConfigLoader::load("./config/laptop_policy").unwrap();
///
/// // Get the cap for a category
/// let rule = loader.category_rule(Category::Developer).unwrap();
/// println!("Developer cap: {}", rule.cap);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory
    ///   (e.g., "./config/laptop_policy")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any term carries a value the engine cannot compute with
    ///
    /// # Example
    ///
    /// ```no_run
    /// use reimbursement_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/laptop_policy")?;
    /// # Ok::<(), reimbursement_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load policy.yaml
        let policy_path = path.join("policy.yaml");
        let metadata = Self::load_yaml::<PolicyMetadata>(&policy_path)?;

        // Load categories.yaml
        let categories_path = path.join("categories.yaml");
        let categories_config = Self::load_yaml::<CategoriesConfig>(&categories_path)?;

        // Load terms.yaml
        let terms_path = path.join("terms.yaml");
        let terms = Self::load_yaml::<TermsConfig>(&terms_path)?;
        Self::validate_terms(&terms_path, &terms)?;

        let config = PolicyConfig::new(metadata, categories_config.categories, terms);

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Rejects term values the calculations cannot work with.
    fn validate_terms(path: &Path, terms: &TermsConfig) -> EngineResult<()> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        let share = terms.reimbursement.share;
        if share <= Decimal::ZERO || share > Decimal::ONE {
            return Err(invalid(format!(
                "reimbursement share must be within (0, 1], got {}",
                share
            )));
        }
        if terms.depreciation.annual_rate <= Decimal::ZERO {
            return Err(invalid(format!(
                "depreciation annual_rate must be positive, got {}",
                terms.depreciation.annual_rate
            )));
        }
        let max_rate = terms.depreciation.max_rate;
        if max_rate <= Decimal::ZERO || max_rate > Decimal::ONE {
            return Err(invalid(format!(
                "depreciation max_rate must be within (0, 1], got {}",
                max_rate
            )));
        }
        if terms.depreciation.month_length_days <= Decimal::ZERO {
            return Err(invalid(format!(
                "depreciation month_length_days must be positive, got {}",
                terms.depreciation.month_length_days
            )));
        }
        if terms.installments.months == 0 {
            return Err(invalid("installment months must be at least 1".to_string()));
        }
        if terms.eligibility.min_tenure_days < 0 {
            return Err(invalid(format!(
                "eligibility min_tenure_days must not be negative, got {}",
                terms.eligibility.min_tenure_days
            )));
        }

        Ok(())
    }

    /// Returns the loaded policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the policy metadata.
    pub fn policy(&self) -> &PolicyMetadata {
        self.config.policy()
    }

    /// Looks up the cap rule for a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` if the policy configuration has no cap
    /// for the category.
    pub fn category_rule(&self, category: Category) -> EngineResult<&CategoryRule> {
        self.config.category_rule(category)
    }
}
