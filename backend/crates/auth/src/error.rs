//! Auth Error Types
//!
//! Auth-specific error variants that render through the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entity::principal::PermissionDenied;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account exists but holds no role
    #[error("Account has no role assigned")]
    AccountDisabled,

    /// Token missing, badly signed, unknown or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Request to a protected path without a session
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// Malformed request body
    #[error(transparent)]
    Validation(AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::SessionInvalid
            | AuthError::AuthenticationRequired => ErrorKind::Unauthorized,
            AuthError::AccountDisabled | AuthError::PermissionDenied(_) => ErrorKind::Forbidden,
            AuthError::Validation(err) => err.kind(),
            AuthError::Database(e) => classify_sqlx(e).kind(),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Validation(err) => err,
            AuthError::AuthenticationRequired => AppError::unauthorized("Authentication required")
                .with_action("Sign in via POST /auth/signin"),
            // Internals stay in the logs
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(_) => AppError::internal("Authentication backend failure"),
            other => AppError::new(other.kind(), other.to_string()),
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
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AuthError::PermissionDenied(denied) => {
                tracing::warn!(error = %denied, "Permission denied");
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
        self.into_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AuthError::Validation(err)
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}
