//! Core traits for Gridkeeper
//!
//! Descriptors and configuration implement [`Validatable`] so that a
//! controller can refuse to start from an inconsistent declaration.

use crate::error::ConsoleResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use gridkeeper_core::{ConsoleError, ConsoleResult, Validatable};
///
/// struct Endpoint {
///     path: String,
/// }
///
/// impl Validatable for Endpoint {
///     fn validate(&self) -> ConsoleResult<()> {
///         if !self.path.starts_with('/') {
///             return Err(ConsoleError::validation("Path must be absolute"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `ConsoleError` describing the problem.
    fn validate(&self) -> ConsoleResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;

    struct Path(&'static str);

    impl Validatable for Path {
        fn validate(&self) -> ConsoleResult<()> {
            if self.0.starts_with('/') {
                Ok(())
            } else {
                Err(ConsoleError::validation("Path must be absolute"))
            }
        }
    }

    #[test]
    fn test_validatable_defaults() {
        assert!(Path("/users/").is_valid());
        assert!(!Path("users").is_valid());
        assert_eq!(
            Path("users").validation_errors(),
            vec!["Validation error: Path must be absolute".to_string()]
        );
        assert!(Path("/x").validation_errors().is_empty());
    }
}
