//! Error conversions
//!
//! Maps PostgreSQL failures onto [`AppError`] and renders [`AppError`] as an
//! HTTP response. Both are feature-gated.

#[cfg(feature = "sqlx")]
use super::app_error::AppError;

/// Classify a PostgreSQL SQLSTATE
///
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
#[cfg(feature = "sqlx")]
fn classify_sqlstate(code: Option<&str>) -> AppError {
    match code {
        // A gallery still references the file, or the referenced row is gone
        Some("23503") => AppError::conflict("Record is still referenced or missing a reference"),
        Some("23505") => AppError::conflict("Duplicate key value"),
        Some("23502" | "23514") => AppError::bad_request("Record violates a column constraint"),
        Some("40001" | "40P01") => {
            AppError::service_unavailable("Concurrent update, retry the request")
        }
        Some("53000" | "53100" | "53200" | "53300") => {
            AppError::service_unavailable("Database resource exhausted")
        }
        _ => AppError::internal("Database error"),
    }
}

/// Classify a database failure without taking ownership of it
///
/// Feature error enums use this to report a status that matches what
/// `From<sqlx::Error>` will render.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            AppError::service_unavailable("Database unavailable")
        }
        sqlx::Error::Database(db_err) => classify_sqlstate(db_err.code().as_deref()),
        _ => AppError::internal("Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx(&err).with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details, plus a `code` discriminator
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "code": self.kind().code(),
            "detail": self.message(),
            "action": self.action(),
        });

        if !self.violations().is_empty() {
            body["violations"] = serde_json::json!(self.violations());
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlstate_classification() {
        use super::classify_sqlstate;
        use crate::error::kind::ErrorKind;

        assert_eq!(classify_sqlstate(Some("23503")).kind(), ErrorKind::Conflict);
        assert_eq!(classify_sqlstate(Some("23505")).kind(), ErrorKind::Conflict);
        assert_eq!(classify_sqlstate(Some("23514")).kind(), ErrorKind::BadRequest);
        assert_eq!(
            classify_sqlstate(Some("40001")).kind(),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            classify_sqlstate(Some("XX000")).kind(),
            ErrorKind::InternalServerError
        );
        assert_eq!(classify_sqlstate(None).kind(), ErrorKind::InternalServerError);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_pool_timeout_is_unavailable() {
        use crate::error::{app_error::AppError, kind::ErrorKind};

        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert!(!err.message().contains("pool"));
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_problem_details_body() {
        use axum::response::IntoResponse;

        use crate::error::app_error::AppError;
        use crate::error::violation::FieldViolation;

        let response =
            AppError::validation(vec![FieldViolation::new("name", "must not be blank")])
                .into_response();
        assert_eq!(response.status().as_u16(), 400);
    }
}
