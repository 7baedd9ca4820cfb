//! Error types for crudkit

use thiserror::Error;

/// Result type alias for crudkit operations
pub type CrudResult<T> = Result<T, CrudError>;

/// Error types for editor configuration and statement execution
#[derive(Debug, Error)]
pub enum CrudError {
    /// Invalid editor configuration (empty field set, duplicate field,
    /// missing primary key, keyset pagination without a column, ...).
    /// Raised once, at build time; a built editor never produces this.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The supplied page payload does not match the configured
    /// pagination mode.
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// Statement execution failed. Whatever the underlying executor
    /// reports is carried through unchanged.
    #[error("Execution error: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A driver value could not be scanned into a [`Value`](crate::Value)
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A record could not be serialized into a form
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CrudError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a pagination error
    pub fn pagination(message: impl Into<String>) -> Self {
        Self::Pagination(message.into())
    }

    /// Create an execution error from a plain message
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into().into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a pagination error
    pub fn is_pagination(&self) -> bool {
        matches!(self, Self::Pagination(_))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CrudError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Execution(err)
    }
}
