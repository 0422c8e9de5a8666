//! Repository Traits

use kernel::id::{PetId, PetStatusId, UploadedFileId};

use crate::domain::entities::{Pet, PetStatus, UploadedFile};
use crate::error::PetsResult;

#[trait_variant::make(PetRepository: Send)]
pub trait LocalPetRepository {
    async fn find_all(&self) -> PetsResult<Vec<Pet>>;

    /// Pets with name, type and sex present
    async fn find_complete(&self) -> PetsResult<Vec<Pet>>;

    async fn find_by_id(&self, id: &PetId) -> PetsResult<Option<Pet>>;

    async fn create(&self, pet: &Pet) -> PetsResult<()>;

    /// Persist the editable fields; `false` if the pet no longer exists
    async fn update(&self, pet: &Pet) -> PetsResult<bool>;

    /// `false` if there was nothing to delete
    async fn delete(&self, id: &PetId) -> PetsResult<bool>;

    async fn update_image_url(&self, id: &PetId, url: &str) -> PetsResult<bool>;

    /// Append `file` to the end of the gallery
    async fn add_to_gallery(&self, id: &PetId, file: &UploadedFile) -> PetsResult<bool>;

    async fn remove_from_gallery(&self, id: &PetId, file_id: &UploadedFileId)
    -> PetsResult<bool>;
}

#[trait_variant::make(PetStatusRepository: Send)]
pub trait LocalPetStatusRepository {
    async fn find_status(&self, id: &PetStatusId) -> PetsResult<Option<PetStatus>>;
}

/// Storage for uploaded binaries
#[trait_variant::make(FileStorage: Send)]
pub trait LocalFileStorage {
    /// Store `bytes` under a fresh name ending in `.{extension}`
    async fn store(&self, bytes: &[u8], extension: &str) -> PetsResult<UploadedFile>;

    async fn get(&self, id: &UploadedFileId) -> PetsResult<Option<UploadedFile>>;

    async fn delete(&self, id: &UploadedFileId) -> PetsResult<()>;
}
