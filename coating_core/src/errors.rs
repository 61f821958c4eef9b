//! # Error Types
//!
//! Structured error types for coating_core. Field-level validation of a
//! calculator form is reported as a list of messages (see
//! [`CoatingCostInput::validate`](crate::calculations::CoatingCostInput::validate));
//! everything that stops an operation outright is a [`CalcError`].
//!
//! ## Example
//!
//! ```rust
//! use coating_core::errors::{CalcError, CalcResult};
//!
//! fn check_coverage(coverage: f64) -> CalcResult<()> {
//!     if coverage <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "coverage_per_unit",
//!             coverage.to_string(),
//!             "Coverage must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! assert!(check_coverage(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for coating_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// One or more form rules failed; carries every message
    #[error("Validation failed: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    /// A derived per-unit metric would divide by zero
    #[error("Division by zero: '{field}' is zero")]
    DivisionByZero { field: String },

    /// Product id not present in the catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Quote id not present in the quote book
    #[error("Quote not found: {quote_id}")]
    QuoteNotFound { quote_id: String },

    /// Quote status change that the lifecycle does not allow
    #[error("Invalid status transition for quote {quote_id}: {from} -> {to}")]
    InvalidTransition {
        quote_id: String,
        from: String,
        to: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DivisionByZero error
    pub fn division_by_zero(field: impl Into<String>) -> Self {
        CalcError::DivisionByZero { field: field.into() }
    }

    /// Create a ProductNotFound error
    pub fn product_not_found(product_id: impl Into<String>) -> Self {
        CalcError::ProductNotFound {
            product_id: product_id.into(),
        }
    }

    /// Create a QuoteNotFound error
    pub fn quote_not_found(quote_id: impl ToString) -> Self {
        CalcError::QuoteNotFound {
            quote_id: quote_id.to_string(),
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(quote_id: impl ToString, from: impl ToString, to: impl ToString) -> Self {
        CalcError::InvalidTransition {
            quote_id: quote_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::Validation { .. } => "VALIDATION_FAILED",
            CalcError::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            CalcError::ProductNotFound { .. } => "PRODUCT_NOT_FOUND",
            CalcError::QuoteNotFound { .. } => "QUOTE_NOT_FOUND",
            CalcError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("surface_area", "-5", "Area must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::division_by_zero("number_of_coats").error_code(), "DIVISION_BY_ZERO");
        assert_eq!(CalcError::product_not_found("X-1").error_code(), "PRODUCT_NOT_FOUND");
        assert_eq!(
            CalcError::Validation { errors: vec![] }.error_code(),
            "VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_validation_message_joins_errors() {
        let error = CalcError::Validation {
            errors: vec!["Project name is required".into(), "Number of coats must be at least 1".into()],
        };
        assert_eq!(
            error.to_string(),
            "Validation failed: Project name is required; Number of coats must be at least 1"
        );
    }

    #[test]
    fn test_only_lock_errors_are_recoverable() {
        assert!(CalcError::file_locked("a.hzq", "someone", "now").is_recoverable());
        assert!(!CalcError::quote_not_found("abc").is_recoverable());
    }
}
