//! Error types for the SDK
//!
//! Validation failures come from the script builders and are raised before
//! anything reaches the client. Client failures are carried unchanged.

use cozolite::{ClientError, ScriptError};
use thiserror::Error;

/// SDK errors
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input rejected before any script was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ScriptError),

    /// Failure reported by the underlying client
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// The client failure, if this error passed one through
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Client(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_passes_through_unchanged() {
        let original = ClientError::new("relation airport not found").with_code("query::not_found");
        let err = Error::from(original.clone());
        assert_eq!(err.to_string(), "relation airport not found");
        assert_eq!(err.client_error(), Some(&original));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_message() {
        let err = Error::from(ScriptError::EmptyRows);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: Data cannot be empty");
    }
}
