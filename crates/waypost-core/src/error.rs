//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed on {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{field} already exists. Please choose another.")]
    Duplicate { field: String },

    #[error("Invalid credentials")]
    Unauthenticated,

    #[error("Not the owner of this resource")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Store-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Duplicate value for unique field {field}")]
    Duplicate { field: String },
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => DomainError::Duplicate { field },
            StoreError::NotFound => DomainError::Internal("entity vanished mid-operation".into()),
            StoreError::Connection(msg) | StoreError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
