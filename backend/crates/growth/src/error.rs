//! Growth Error Types
//!
//! Growth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::multipart::FormError;
use platform::upload::UploadError;
use thiserror::Error;

/// Growth-specific result type alias
pub type GrowthResult<T> = Result<T, GrowthError>;

/// Growth-specific error variants
#[derive(Debug, Error)]
pub enum GrowthError {
    /// Account absent or owned by another user
    #[error("Account not found")]
    AccountNotFound,

    /// Record absent or its account owned by another user
    #[error("Record not found")]
    RecordNotFound,

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

impl GrowthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrowthError::AccountNotFound | GrowthError::RecordNotFound => ErrorKind::NotFound,
            GrowthError::Validation(_) => ErrorKind::BadRequest,
            GrowthError::PayloadTooLarge => ErrorKind::PayloadTooLarge,
            GrowthError::Upload(e) if e.is_client_error() => ErrorKind::BadRequest,
            GrowthError::Upload(_) | GrowthError::Database(_) | GrowthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GrowthError::Database(e) => {
                tracing::error!(error = %e, "Growth database error");
            }
            GrowthError::Internal(msg) => {
                tracing::error!(message = %msg, "Growth internal error");
            }
            GrowthError::Upload(e) if !e.is_client_error() => {
                tracing::error!(error = %e, "Growth upload storage error");
            }
            _ => {
                tracing::debug!(error = %self, "Growth error");
            }
        }
    }
}

impl IntoResponse for GrowthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<FormError> for GrowthError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::TooLarge => GrowthError::PayloadTooLarge,
            other => GrowthError::Validation(other.to_string()),
        }
    }
}

/// Default-account provisioning runs inside the auth login flow
impl From<GrowthError> for AuthError {
    fn from(err: GrowthError) -> Self {
        match err {
            GrowthError::Database(e) => AuthError::Database(e),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GrowthError::AccountNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(GrowthError::RecordNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GrowthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GrowthError::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            GrowthError::Upload(UploadError::Empty).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GrowthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let app_err = GrowthError::Internal("disk /var/lib exploded".into()).to_app_error();
        assert_eq!(app_err.client_message(), "Internal server error");
    }
}
