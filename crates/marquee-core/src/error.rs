//! Error types for Marquee Core

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Session error types
#[derive(Error, Debug)]
pub enum Error {
    // Handle errors
    #[error("Failed to create player handle: {0}")]
    HandleCreation(String),

    // Engine errors
    #[error("Engine rejected {operation}: {message}")]
    Engine { operation: String, message: String },

    // Media locator errors
    #[error("Invalid media locator: {0}")]
    InvalidMediaUri(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an engine error for a named contract operation
    pub fn engine(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Engine {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error ends the session.
    ///
    /// Handle creation failure is unrecoverable: there is nothing to retry
    /// against and the session never reaches the active state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::HandleCreation(_))
    }

    /// Returns the error code for structured reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::HandleCreation(_) => "HANDLE_CREATE",
            Error::Engine { .. } => "ENGINE",
            Error::InvalidMediaUri(_) => "INVALID_URI",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Internal(_) => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::HandleCreation("no decoder".into()).is_fatal());
        assert!(!Error::engine("prepare", "bad container").is_fatal());
        assert!(!Error::InvalidConfig("empty user agent".into()).is_fatal());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::HandleCreation("x".into()).error_code(), "HANDLE_CREATE");
        assert_eq!(Error::engine("seek", "x").error_code(), "ENGINE");
    }
}
