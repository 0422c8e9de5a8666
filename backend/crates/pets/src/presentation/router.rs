//! Pets Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::application::config::PetsConfig;
use crate::domain::repository::{FileStorage, PetRepository, PetStatusRepository};
use crate::infra::{PgLocalFileStorage, PgPetRepository};
use crate::presentation::handlers::{self, PetsAppState};

/// Create the Pets router with PostgreSQL repository and local file storage
pub fn pets_router(repo: PgPetRepository, storage: PgLocalFileStorage, config: PetsConfig) -> Router {
    pets_router_generic(repo, storage, config)
}

/// Create a generic Pets router for any repository/storage implementation
pub fn pets_router_generic<R, F>(repo: R, storage: F, config: PetsConfig) -> Router
where
    R: PetRepository + PetStatusRepository + Clone + Send + Sync + 'static,
    F: FileStorage + Clone + Send + Sync + 'static,
{
    let body_limit = DefaultBodyLimit::max(config.max_upload_bytes);
    let state = PetsAppState {
        repo: Arc::new(repo),
        storage: Arc::new(storage),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_pets::<R, F>).post(handlers::create_pet::<R, F>),
        )
        .route(
            "/{id}",
            get(handlers::get_pet::<R, F>)
                .put(handlers::update_pet::<R, F>)
                .delete(handlers::delete_pet::<R, F>),
        )
        .route("/{id}/images", post(handlers::upload_image::<R, F>))
        .route("/{id}/gallery", post(handlers::upload_gallery_image::<R, F>))
        .route(
            "/{pet_id}/gallery/{image_id}",
            delete(handlers::remove_gallery_image::<R, F>),
        )
        .layer(body_limit)
        .with_state(state)
}
