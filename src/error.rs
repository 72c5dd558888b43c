//! Error types for Schoolib server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Path clients are sent to when a request carries no valid session
pub const LOGIN_PATH: &str = "/login";

/// Application error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    Forbidden = 3,
    DbFailure = 4,
    InvalidCredentials = 5,
    DuplicateEmail = 6,
    NoSuchBook = 7,
    BookUnavailable = 8,
    NoCopiesLeft = 9,
    TransactionFailure = 10,
    NoSuchData = 11,
    BadValue = 12,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Book with id {0} not found")]
    BookNotFound(i64),

    #[error("Book with id {0} is not available")]
    Unavailable(i64),

    #[error("Book with id {0} has no copies left")]
    AvailabilityError(i64),

    #[error("Transaction failed: {0}")]
    TransactionFailure(#[source] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// "warning" for expected business outcomes, "error" otherwise
    pub severity: String,
    /// Where the client should go next, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl AppError {
    /// Expected outcomes that are reported to the user, not system faults
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::Unavailable(_) | AppError::DuplicateEmail(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let severity = if self.is_warning() { "warning" } else { "error" };
        let redirect = matches!(self, AppError::Unauthenticated).then(|| LOGIN_PATH.to_string());

        let (status, code, message) = match &self {
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, ErrorCode::InvalidCredentials, self.to_string())
            }
            AppError::DuplicateEmail(_) => {
                (StatusCode::CONFLICT, ErrorCode::DuplicateEmail, self.to_string())
            }
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated, self.to_string())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg.clone())
            }
            AppError::BookNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, self.to_string())
            }
            AppError::Unavailable(_) => {
                (StatusCode::CONFLICT, ErrorCode::BookUnavailable, self.to_string())
            }
            AppError::AvailabilityError(_) => {
                (StatusCode::CONFLICT, ErrorCode::NoCopiesLeft, self.to_string())
            }
            AppError::TransactionFailure(e) => {
                tracing::error!("Transaction failure: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::TransactionFailure,
                    "The operation could not be completed".to_string(),
                )
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            severity: severity.to_string(),
            redirect,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_outcomes_are_warnings() {
        assert!(AppError::Unavailable(1).is_warning());
        assert!(AppError::DuplicateEmail("a@x.com".into()).is_warning());
        assert!(!AppError::InvalidCredentials.is_warning());
        assert!(!AppError::AvailabilityError(1).is_warning());
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::Unauthenticated.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::BookNotFound(3).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unavailable(3).into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::TransactionFailure(sqlx::Error::PoolTimedOut).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
