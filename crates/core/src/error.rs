//! Error types for Gridkeeper
//!
//! This module provides unified error handling for the descriptor layer,
//! configuration loading and record handling. Network failures have their
//! own type in the client crate.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Gridkeeper
#[derive(Debug, Error)]
pub enum ConsoleError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required form field was left empty
    #[error("{label} is required")]
    RequiredField { field: String, label: String },

    /// Entity descriptor is inconsistent
    #[error("Descriptor for '{entity}' is invalid: {message}")]
    Descriptor { entity: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Entity type not known to the catalog
    #[error("Entity type not found: {0}")]
    EntityNotFound(String),

    /// Record lacks its identifier field
    #[error("Record has no identifier field '{0}'")]
    MissingIdentifier(String),

    // ========================================================================
    // IO / Serialization Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Expected a JSON object for a record
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl ConsoleError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ConsoleError::Validation(msg.into())
    }

    /// Create a required-field error
    pub fn required(field: impl Into<String>, label: impl Into<String>) -> Self {
        ConsoleError::RequiredField {
            field: field.into(),
            label: label.into(),
        }
    }

    /// Create a descriptor error
    pub fn descriptor(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        ConsoleError::Descriptor {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ConsoleError::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ConsoleError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        ConsoleError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConsoleError::Validation(_)
                | ConsoleError::RequiredField { .. }
                | ConsoleError::Descriptor { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConsoleError::EntityNotFound(_)
                | ConsoleError::MissingIdentifier(_)
        )
    }
}

/// Result type alias using ConsoleError
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> ConsoleResult<T>;
}

impl<T, E: Into<ConsoleError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> ConsoleResult<T> {
        self.map_err(|e| {
            let err: ConsoleError = e.into();
            ConsoleError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = ConsoleError::validation("Name is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_required_field_error() {
        let err = ConsoleError::required("rolename", "Role name");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Role name is required");
    }

    #[test]
    fn test_descriptor_error() {
        let err = ConsoleError::descriptor("Module", "edit action without update endpoint");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Descriptor for 'Module' is invalid: edit action without update endpoint"
        );
    }

    #[test]
    fn test_not_found_errors() {
        let err = ConsoleError::EntityNotFound("widgets".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity type not found: widgets");
        assert!(ConsoleError::MissingIdentifier("username".into()).is_not_found());
    }

    #[test]
    fn test_error_with_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_context("Loading config").unwrap_err();
        assert_eq!(err.to_string(), "Loading config: IO error: denied");
    }
}
