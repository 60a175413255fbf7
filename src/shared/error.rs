//! Shared Error Types
//!
//! Errors raised while checking a record's fields before anything is sent.
//!
//! # Usage
//!
//! ```rust
//! use apm_console::shared::error::SharedError;
//!
//! let error = SharedError::validation("display_name", "Display name is required");
//! assert_eq!(error.field(), "display_name");
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and API layers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field
    pub fn field(&self) -> &str {
        match self {
            Self::ValidationError { field, .. } => field,
        }
    }
}
