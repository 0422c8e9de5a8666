//! Schedule Error Types
//!
//! Schedule-specific error variants that render through the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind, violation::FieldViolation};
use kernel::id::{ReservationId, UserId};
use thiserror::Error;

use auth::PermissionDenied;

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error("User {0} not found")]
    OwnerNotFound(UserId),

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error("Request validation failed")]
    Validation(Vec<FieldViolation>),

    /// Malformed query parameter
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Reservation does not match an opening period")]
    OutsideOpeningHours,

    #[error("Reservation overlaps an existing reservation")]
    Overlap,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScheduleError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::ReservationNotFound(_) | ScheduleError::OwnerNotFound(_) => {
                ErrorKind::NotFound
            }
            ScheduleError::PermissionDenied(_) => ErrorKind::Forbidden,
            ScheduleError::Validation(_) => ErrorKind::Validation,
            ScheduleError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ScheduleError::BadRequest(_) => ErrorKind::BadRequest,
            ScheduleError::OutsideOpeningHours => ErrorKind::UnprocessableEntity,
            ScheduleError::Overlap => ErrorKind::Conflict,
            ScheduleError::Database(e) => classify_sqlx(e).kind(),
            ScheduleError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            ScheduleError::Validation(violations) => AppError::validation(violations),
            ScheduleError::OutsideOpeningHours => {
                AppError::unprocessable("Reservation does not match an opening period")
                    .with_action("Pick one of the periods listed in the schedule configs")
            }
            ScheduleError::Database(e) => AppError::from(e),
            ScheduleError::Internal(_) => AppError::internal("Schedule backend failure"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ScheduleError::Database(e) => {
                tracing::error!(error = %e, "Schedule database error");
            }
            ScheduleError::Internal(msg) => {
                tracing::error!(message = %msg, "Schedule internal error");
            }
            ScheduleError::PermissionDenied(denied) => {
                tracing::warn!(error = %denied, "Permission denied");
            }
            _ => {
                tracing::debug!(error = %self, "Schedule error");
            }
        }
    }
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<PathRejection> for ScheduleError {
    fn from(rejection: PathRejection) -> Self {
        ScheduleError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ScheduleError {
    fn from(rejection: JsonRejection) -> Self {
        ScheduleError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ScheduleError {
    fn from(rejection: QueryRejection) -> Self {
        ScheduleError::InvalidArgument(rejection.body_text())
    }
}
