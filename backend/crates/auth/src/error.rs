//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::multipart::FormError;
use platform::upload::UploadError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User name already registered (compared case-insensitively)
    #[error("Username already exists")]
    UserNameTaken,

    /// Email already registered
    #[error("Email already exists")]
    EmailTaken,

    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No bearer token on a protected route
    #[error("Authentication required")]
    MissingToken,

    /// Token failed signature, format or expiry checks
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token was valid but its user no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Request body exceeded the configured limit
    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    /// Upload rejected or could not be written
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    ///
    /// Duplicate registrations and bad credentials are reported as 400,
    /// which is what the web client expects.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNameTaken
            | AuthError::EmailTaken
            | AuthError::InvalidCredentials
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::MissingToken => ErrorKind::Unauthorized,
            AuthError::InvalidToken => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::PayloadTooLarge => ErrorKind::PayloadTooLarge,
            AuthError::Upload(e) if e.is_client_error() => ErrorKind::BadRequest,
            AuthError::Upload(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let app_err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::InvalidToken => app_err.with_action("Please log in again"),
            _ => app_err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Upload(e) if !e.is_client_error() => {
                tracing::error!(error = %e, "Auth upload storage error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected invalid bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err.message().to_string())
        }
    }
}

impl From<FormError> for AuthError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::TooLarge => AuthError::PayloadTooLarge,
            other => AuthError::Validation(other.to_string()),
        }
    }
}
