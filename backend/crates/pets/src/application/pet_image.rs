//! Pet Image Use Case
//!
//! Main image upload, gallery upload and gallery removal.

use std::sync::Arc;

use auth::Principal;
use kernel::id::{PetId, UploadedFileId};
use platform::image::detect_image_format;

use crate::application::config::PetsConfig;
use crate::domain::entities::UploadedFile;
use crate::domain::policy;
use crate::domain::repository::{FileStorage, PetRepository};
use crate::error::{PetsError, PetsResult};

/// Where an uploaded image ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Main,
    Gallery,
}

pub struct PetImageUseCase<P, F>
where
    P: PetRepository,
    F: FileStorage,
{
    pets: Arc<P>,
    storage: Arc<F>,
    config: Arc<PetsConfig>,
}

impl<P, F> PetImageUseCase<P, F>
where
    P: PetRepository,
    F: FileStorage,
{
    pub fn new(pets: Arc<P>, storage: Arc<F>, config: Arc<PetsConfig>) -> Self {
        Self {
            pets,
            storage,
            config,
        }
    }

    /// Store `bytes` as the pet's main image and return its public URL
    pub async fn upload_main_image(
        &self,
        principal: &Principal,
        pet_id: PetId,
        bytes: Option<Vec<u8>>,
    ) -> PetsResult<String> {
        self.upload(principal, pet_id, bytes, ImageSlot::Main).await
    }

    /// Store `bytes` at the end of the pet's gallery and return its public URL
    pub async fn upload_gallery_image(
        &self,
        principal: &Principal,
        pet_id: PetId,
        bytes: Option<Vec<u8>>,
    ) -> PetsResult<String> {
        self.upload(principal, pet_id, bytes, ImageSlot::Gallery)
            .await
    }

    async fn upload(
        &self,
        principal: &Principal,
        pet_id: PetId,
        bytes: Option<Vec<u8>>,
        slot: ImageSlot,
    ) -> PetsResult<String> {
        policy::authorize_mutation(principal)?;

        if self.pets.find_by_id(&pet_id).await?.is_none() {
            return Err(PetsError::PetNotFound(pet_id));
        }

        let bytes = bytes.ok_or(PetsError::MissingFile)?;
        let format = detect_image_format(&bytes).ok_or(PetsError::InvalidImage)?;

        let mut file = self.storage.store(&bytes, format.extension()).await?;
        let url = self.config.file_url(&file.path);
        file.file_url = Some(url.clone());

        if let Err(e) = self.commit(pet_id, &file, &url, slot).await {
            // Roll back the stored binary; the commit error is what the caller sees
            if let Err(cleanup) = self.storage.delete(&file.id).await {
                tracing::error!(
                    file_id = %file.id,
                    error = %cleanup,
                    "Failed to delete orphaned upload"
                );
            }
            return Err(e);
        }

        tracing::info!(pet_id = %pet_id, file_id = %file.id, slot = ?slot, "Image uploaded");
        Ok(url)
    }

    async fn commit(
        &self,
        pet_id: PetId,
        file: &UploadedFile,
        url: &str,
        slot: ImageSlot,
    ) -> PetsResult<()> {
        let attached = match slot {
            ImageSlot::Main => self.pets.update_image_url(&pet_id, url).await?,
            ImageSlot::Gallery => self.pets.add_to_gallery(&pet_id, file).await?,
        };
        if attached {
            Ok(())
        } else {
            Err(PetsError::PetNotFound(pet_id))
        }
    }

    /// Detach a gallery image and delete the stored file
    ///
    /// Both phases always run. A detach failure wins over a delete failure;
    /// when both fail the delete failure is only logged.
    pub async fn remove_gallery_image(
        &self,
        principal: &Principal,
        pet_id: PetId,
        image_id: UploadedFileId,
    ) -> PetsResult<()> {
        policy::authorize_mutation(principal)?;

        if self.storage.get(&image_id).await?.is_none() {
            return Err(PetsError::ImageNotFound(image_id));
        }

        let pet = self
            .pets
            .find_by_id(&pet_id)
            .await?
            .ok_or(PetsError::PetNotFound(pet_id))?;

        if !pet.has_in_gallery(&image_id) {
            return Err(PetsError::ImageNotInGallery { pet_id, image_id });
        }

        let detached = match self.pets.remove_from_gallery(&pet_id, &image_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(PetsError::ImageNotInGallery { pet_id, image_id }),
            Err(e) => Err(e),
        };
        let deleted = self.storage.delete(&image_id).await;

        match (detached, deleted) {
            (Ok(()), Ok(())) => {
                tracing::info!(pet_id = %pet_id, file_id = %image_id, "Gallery image removed");
                Ok(())
            }
            (Ok(()), Err(delete_err)) => {
                Err(PetsError::StoredFileDeleteFailed(Box::new(delete_err)))
            }
            (Err(detach_err), Ok(())) => Err(PetsError::GalleryDetachFailed(Box::new(detach_err))),
            (Err(detach_err), Err(delete_err)) => {
                tracing::error!(
                    file_id = %image_id,
                    error = %delete_err,
                    "Stored file delete failed after gallery detach failure"
                );
                Err(PetsError::GalleryDetachFailed(Box::new(detach_err)))
            }
        }
    }
}
