//! HTTP Handlers

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, OriginalUri, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use axum_extra::extract::WithRejection;
use kernel::id::{PetId, UploadedFileId};
use std::sync::Arc;

use auth::Principal;

use crate::application::config::PetsConfig;
use crate::application::{PetCommandUseCase, PetImageUseCase, PetQueryUseCase};
use crate::domain::policy;
use crate::domain::repository::{FileStorage, PetRepository, PetStatusRepository};
use crate::error::{PetsError, PetsResult};
use crate::presentation::dto::{PetRequestBody, PetView, UrlView};
use crate::presentation::mapper::{pet_to_view, pets_to_views, request_to_draft};

/// Shared state for pets handlers
#[derive(Clone)]
pub struct PetsAppState<R, F>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub storage: Arc<F>,
    pub config: Arc<PetsConfig>,
}

fn location(value: &str) -> PetsResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| PetsError::Internal(format!("Invalid Location header: {value}")))
}

/// Bytes of the multipart field `file`, if sent
///
/// Admins only; the body is not read for anyone else.
async fn read_file_field(
    principal: &Principal,
    multipart: Result<Multipart, MultipartRejection>,
) -> PetsResult<Option<Vec<u8>>> {
    policy::authorize_mutation(principal)?;

    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            return Ok(Some(field.bytes().await?.to_vec()));
        }
    }
    Ok(None)
}

// ============================================================================
// Queries
// ============================================================================

/// GET /pets
pub async fn list_pets<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
) -> PetsResult<Json<Vec<PetView>>>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let pets = PetQueryUseCase::new(state.repo.clone())
        .list(&principal)
        .await?;
    Ok(Json(pets_to_views(&pets)))
}

/// GET /pets/{id}
pub async fn get_pet<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    WithRejection(Path(id), _): WithRejection<Path<PetId>, PetsError>,
) -> PetsResult<Json<PetView>>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let pet = PetQueryUseCase::new(state.repo.clone())
        .get(&principal, id)
        .await?;
    Ok(Json(pet_to_view(&pet)))
}

// ============================================================================
// Commands
// ============================================================================

/// POST /pets
pub async fn create_pet<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    OriginalUri(uri): OriginalUri,
    WithRejection(Json(body), _): WithRejection<Json<PetRequestBody>, PetsError>,
) -> PetsResult<impl IntoResponse>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let pet = PetCommandUseCase::new(state.repo.clone())
        .create(&principal, request_to_draft(body))
        .await?;

    let url = format!("{}/{}", uri.path().trim_end_matches('/'), pet.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(&url)?)],
        Json(pet_to_view(&pet)),
    ))
}

/// PUT /pets/{id}
pub async fn update_pet<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    WithRejection(Path(id), _): WithRejection<Path<PetId>, PetsError>,
    WithRejection(Json(body), _): WithRejection<Json<PetRequestBody>, PetsError>,
) -> PetsResult<Json<PetView>>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let pet = PetCommandUseCase::new(state.repo.clone())
        .update(&principal, id, request_to_draft(body))
        .await?;
    Ok(Json(pet_to_view(&pet)))
}

/// DELETE /pets/{id}
pub async fn delete_pet<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    WithRejection(Path(id), _): WithRejection<Path<PetId>, PetsError>,
) -> PetsResult<StatusCode>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    PetCommandUseCase::new(state.repo.clone())
        .delete(&principal, id)
        .await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Images
// ============================================================================

/// POST /pets/{id}/images
pub async fn upload_image<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    OriginalUri(uri): OriginalUri,
    WithRejection(Path(id), _): WithRejection<Path<PetId>, PetsError>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PetsResult<impl IntoResponse>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let bytes = read_file_field(&principal, multipart).await?;
    let url = PetImageUseCase::new(state.repo.clone(), state.storage.clone(), state.config.clone())
        .upload_main_image(&principal, id, bytes)
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(uri.path())?)],
        Json(UrlView { url }),
    ))
}

/// POST /pets/{id}/gallery
pub async fn upload_gallery_image<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    OriginalUri(uri): OriginalUri,
    WithRejection(Path(id), _): WithRejection<Path<PetId>, PetsError>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PetsResult<impl IntoResponse>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let bytes = read_file_field(&principal, multipart).await?;
    let url = PetImageUseCase::new(state.repo.clone(), state.storage.clone(), state.config.clone())
        .upload_gallery_image(&principal, id, bytes)
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(uri.path())?)],
        Json(UrlView { url }),
    ))
}

/// DELETE /pets/{pet_id}/gallery/{image_id}
pub async fn remove_gallery_image<R, F>(
    State(state): State<PetsAppState<R, F>>,
    principal: Principal,
    WithRejection(Path((pet_id, image_id)), _): WithRejection<
        Path<(PetId, UploadedFileId)>,
        PetsError,
    >,
) -> PetsResult<StatusCode>
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    PetImageUseCase::new(state.repo.clone(), state.storage.clone(), state.config.clone())
        .remove_gallery_image(&principal, pet_id, image_id)
        .await?;
    Ok(StatusCode::OK)
}
