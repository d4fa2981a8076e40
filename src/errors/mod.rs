//! Error types for the reconciliation core
//!
//! Provides:
//! - Distinct error types per failure mode: validation (caller-facing),
//!   integrity (aborts the transaction), store (surfaced, never retried here)
//! - Numeric error codes for operational triage from the batch log

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using ReconError
pub type Result<T> = std::result::Result<T, ReconError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingParameter,
    InvalidFormat,

    // Resource errors (4xxx)
    NotFound,
    PlayerNotFound,
    BatchNotFound,

    // Integrity errors (5xxx)
    IntegrityViolation,

    // Store errors (7xxx)
    StoreError,
    ConnectionError,
    TransactionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingParameter => 1002,
            ErrorCode::InvalidFormat => 1003,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::PlayerNotFound => 4002,
            ErrorCode::BatchNotFound => 4003,

            // Integrity (5xxx)
            ErrorCode::IntegrityViolation => 5001,

            // Store (7xxx)
            ErrorCode::StoreError => 7001,
            ErrorCode::ConnectionError => 7002,
            ErrorCode::TransactionError => 7003,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Reconciliation error types
#[derive(Error, Debug)]
pub enum ReconError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Required parameter missing: {name}")]
    MissingParameter { name: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Player not found: {code}")]
    PlayerNotFound { code: String },

    #[error("Batch not found: {id}")]
    BatchNotFound { id: Uuid },

    // Integrity errors
    #[error("Integrity violation: {message}")]
    Integrity { message: String },

    // Store errors
    #[error("Store error: {0}")]
    Store(#[from] sea_orm::DbErr),

    #[error("Store connection error: {message}")]
    Connection { message: String },

    #[error("Transaction failed: {message}")]
    Transaction { message: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ReconError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ReconError::Validation { .. } => ErrorCode::ValidationError,
            ReconError::MissingParameter { .. } => ErrorCode::MissingParameter,
            ReconError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ReconError::NotFound { .. } => ErrorCode::NotFound,
            ReconError::PlayerNotFound { .. } => ErrorCode::PlayerNotFound,
            ReconError::BatchNotFound { .. } => ErrorCode::BatchNotFound,
            ReconError::Integrity { .. } => ErrorCode::IntegrityViolation,
            ReconError::Store(_) => ErrorCode::StoreError,
            ReconError::Connection { .. } => ErrorCode::ConnectionError,
            ReconError::Transaction { .. } => ErrorCode::TransactionError,
            ReconError::Internal { .. } => ErrorCode::InternalError,
            ReconError::Configuration(_) => ErrorCode::ConfigurationError,
            ReconError::Serialization(_) => ErrorCode::SerializationError,
            ReconError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Validation errors are caller-facing and non-retryable until the
    /// input is corrected
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReconError::Validation { .. }
                | ReconError::MissingParameter { .. }
                | ReconError::InvalidFormat { .. }
        )
    }
}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        ReconError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = ReconError::PlayerNotFound { code: "f0fv".into() };
        assert_eq!(err.code(), ErrorCode::PlayerNotFound);
        assert_eq!(err.code().as_code(), 4002);
    }

    #[test]
    fn test_validation_classification() {
        let err = ReconError::MissingParameter { name: "from_code".into() };
        assert!(err.is_validation());

        let err = ReconError::Integrity { message: "duplicate key".into() };
        assert!(!err.is_validation());
        assert_eq!(err.code().as_code(), 5001);
    }
}
