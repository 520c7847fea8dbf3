//! Error types for apptree
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types raised by the child-app registry and lifecycle
#[derive(Debug, Error)]
pub enum AppError {
    /// No usable class or descriptor was supplied to the factory
    #[error("App build failed. Incorrect configuration.")]
    Configuration,

    /// A child with this name is already registered on the parent
    #[error("A child App with name \"{0}\" has already been added.")]
    DuplicateName(String),

    /// The instance is already registered as a child somewhere
    #[error("App is already registered as child \"{0}\" and cannot be added again.")]
    AlreadyRegistered(String),

    /// A lifecycle hook reported a failure
    #[error("Hook failed: {0}")]
    Hook(String),
}

impl AppError {
    /// Create a hook failure from any displayable message
    pub fn hook(message: impl Into<String>) -> Self {
        AppError::Hook(message.into())
    }
}

/// Result type alias for apptree operations
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = AppError::Configuration;
        assert_eq!(err.to_string(), "App build failed. Incorrect configuration.");
    }

    #[test]
    fn test_duplicate_name_error() {
        let err = AppError::DuplicateName("cA3".to_string());
        assert_eq!(err.to_string(), "A child App with name \"cA3\" has already been added.");
    }

    #[test]
    fn test_already_registered_error() {
        let err = AppError::AlreadyRegistered("x".to_string());
        assert_eq!(err.to_string(), "App is already registered as child \"x\" and cannot be added again.");
    }

    #[test]
    fn test_hook_error() {
        let err = AppError::hook("refused to start");
        assert_eq!(err.to_string(), "Hook failed: refused to start");
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(AppError::Configuration)
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
