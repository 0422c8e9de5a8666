//! Pets Error Types
//!
//! Pets-specific error variants that render through the unified
//! `kernel::error::AppError` system.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind, violation::FieldViolation};
use kernel::id::{PetId, UploadedFileId};
use thiserror::Error;

use auth::PermissionDenied;

pub type PetsResult<T> = Result<T, PetsError>;

#[derive(Debug, Error)]
pub enum PetsError {
    #[error("Pet {0} not found")]
    PetNotFound(PetId),

    #[error("Image {0} not found")]
    ImageNotFound(UploadedFileId),

    #[error("Image {image_id} is not in the gallery of pet {pet_id}")]
    ImageNotInGallery {
        pet_id: PetId,
        image_id: UploadedFileId,
    },

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error("Request validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Multipart field 'file' is missing")]
    MissingFile,

    #[error("{0}")]
    BadRequest(String),

    #[error("Uploaded file is not a supported image")]
    InvalidImage,

    /// Gallery reference could not be removed; the stored file delete was
    /// still attempted
    #[error("Failed to detach image from gallery: {0}")]
    GalleryDetachFailed(Box<PetsError>),

    /// Reference removed but the stored file could not be deleted
    #[error("Image detached but stored file could not be deleted: {0}")]
    StoredFileDeleteFailed(Box<PetsError>),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PetsError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PetsError::PetNotFound(_)
            | PetsError::ImageNotFound(_)
            | PetsError::ImageNotInGallery { .. } => ErrorKind::NotFound,
            PetsError::PermissionDenied(_) => ErrorKind::Forbidden,
            PetsError::Validation(_) => ErrorKind::Validation,
            PetsError::MissingFile | PetsError::BadRequest(_) => ErrorKind::BadRequest,
            PetsError::InvalidImage => ErrorKind::UnprocessableEntity,
            PetsError::GalleryDetachFailed(_)
            | PetsError::StoredFileDeleteFailed(_)
            | PetsError::Storage(_)
            | PetsError::Internal(_) => ErrorKind::InternalServerError,
            PetsError::Database(e) => classify_sqlx(e).kind(),
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            PetsError::Validation(violations) => AppError::validation(violations),
            PetsError::MissingFile => AppError::bad_request("Multipart field 'file' is missing")
                .with_action("Send the image as multipart/form-data field 'file'"),
            PetsError::InvalidImage => {
                AppError::unprocessable("Uploaded file is not a supported image")
                    .with_action("Upload a PNG, JPEG, GIF, BMP or WebP image")
            }
            PetsError::GalleryDetachFailed(_) => {
                AppError::internal("Failed to detach image from gallery")
            }
            PetsError::StoredFileDeleteFailed(_) => {
                AppError::internal("Image detached but stored file could not be deleted")
            }
            PetsError::Storage(_) => AppError::internal("File storage failure"),
            PetsError::Database(e) => AppError::from(e),
            PetsError::Internal(_) => AppError::internal("Pets backend failure"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            PetsError::Database(e) => {
                tracing::error!(error = %e, "Pets database error");
            }
            PetsError::Storage(e) => {
                tracing::error!(error = %e, "File storage error");
            }
            PetsError::Internal(msg) => {
                tracing::error!(message = %msg, "Pets internal error");
            }
            PetsError::GalleryDetachFailed(cause) => {
                tracing::warn!(cause = %cause, "Gallery detach failed");
            }
            PetsError::StoredFileDeleteFailed(cause) => {
                tracing::warn!(cause = %cause, "Stored file delete failed");
            }
            PetsError::PermissionDenied(denied) => {
                tracing::warn!(error = %denied, "Permission denied");
            }
            _ => {
                tracing::debug!(error = %self, "Pets error");
            }
        }
    }
}

impl IntoResponse for PetsError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<PathRejection> for PetsError {
    fn from(rejection: PathRejection) -> Self {
        PetsError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for PetsError {
    fn from(rejection: JsonRejection) -> Self {
        PetsError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for PetsError {
    fn from(rejection: MultipartRejection) -> Self {
        PetsError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for PetsError {
    fn from(err: MultipartError) -> Self {
        // Covers bodies over the upload limit as well
        PetsError::BadRequest(err.body_text())
    }
}
