//! Error handling - maps domain failures to RFC 7807 responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use waypost_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
///
/// The status split mirrors the failure taxonomy: validation and
/// duplicate-key problems are 400, missing entities 404, missing or bad
/// credentials 401, authenticated-but-not-owner 403.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation { field: &'static str, message: String },
    Duplicate(String),
    Unauthorized,
    Forbidden,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation { field, message } => {
                write!(f, "Validation failed on {}: {}", field, message)
            }
            AppError::Duplicate(field) => write!(f, "Duplicate value for {}", field),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Duplicate(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail.clone()),
            AppError::Validation { field, message } => {
                ErrorResponse::bad_request(message.clone()).with_field(*field)
            }
            AppError::Duplicate(field) => {
                ErrorResponse::bad_request(format!("{field} already exists. Please choose another."))
                    .with_field(field.clone())
            }
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => {
                ErrorResponse::forbidden().with_detail("You are not the owner of this resource.")
            }
            AppError::Internal(detail) => {
                // Log internal errors; the caller only sees a 500.
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<waypost_core::DomainError> for AppError {
    fn from(err: waypost_core::DomainError) -> Self {
        use waypost_core::DomainError;
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation { field, message } => AppError::Validation { field, message },
            DomainError::Duplicate { field } => AppError::Duplicate(field),
            DomainError::Unauthenticated => AppError::Unauthorized,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
