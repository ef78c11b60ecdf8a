//! Error types for the reimbursement calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during reimbursement calculation.

use thiserror::Error;

/// The main error type for the reimbursement calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use reimbursement_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or contained invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No cap is configured for the given reimbursement category.
    #[error("Category not found in policy configuration: {category}")]
    CategoryNotFound {
        /// The category name that was not found.
        category: String,
    },

    /// A monetary amount was negative or otherwise unusable.
    #[error("Invalid amount in '{field}': {message}")]
    InvalidAmount {
        /// The field holding the invalid amount.
        field: String,
        /// A description of what made the amount invalid.
        message: String,
    },

    /// Processing was requested for a request that was already processed.
    #[error("Request '{request_id}' has already been processed")]
    AlreadyProcessed {
        /// The ID of the already-processed request.
        request_id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
