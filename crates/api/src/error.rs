//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Taxonomy: validation failures → 400 with field-level messages,
//! authorization failures → 403, missing path resources → 404, everything
//! infrastructure-shaped → 500 with a generic body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, OrderError};
use crate::validate::ValidationErrors;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Field-level validation failed.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Malformed or unacceptable request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The caller is not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            RepositoryError::Invalid(errors) => Self::Validation(errors),
            RepositoryError::Conflict(message) => Self::BadRequest(message),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::BadRequest("invalid credentials".to_string()),
            AuthError::UserAlreadyExists => {
                let mut errors = ValidationErrors::new();
                errors.add("email", "is already taken");
                Self::Validation(errors)
            }
            AuthError::InvalidEmail(err) => {
                let mut errors = ValidationErrors::new();
                errors.add("email", err.to_string());
                Self::Validation(errors)
            }
            AuthError::WeakPassword(message) => {
                let mut errors = ValidationErrors::new();
                errors.add("password", message);
                Self::Validation(errors)
            }
            AuthError::PasswordHash => Self::Internal("failed to hash password".to_string()),
            AuthError::Repository(err) => err.into(),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Invalid(errors) => Self::Validation(errors),
            OrderError::ProductNotFound(id) => {
                let mut errors = ValidationErrors::new();
                errors.add("products", format!("product {id} not found"));
                Self::Validation(errors)
            }
            OrderError::PlacementNotFound => Self::NotFound("placement not found".to_string()),
            OrderError::Database(err) => Self::Database(RepositoryError::Database(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            Self::Validation(errors) => {
                (status, Json(json!({ "errors": errors }))).into_response()
            }
            // Don't expose internal error details to clients
            Self::Database(_) | Self::Internal(_) => {
                (status, "Internal server error".to_string()).into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        let mut errors = ValidationErrors::new();
        errors.add("price", "must be positive");
        assert_eq!(
            get_status(AppError::Validation(errors)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_error_mappings() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::UserAlreadyExists.into()),
            StatusCode::BAD_REQUEST
        );
    }
}
