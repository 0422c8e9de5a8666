//! Entity <-> DTO conversion

use crate::domain::entities::{Pet, PetDraft, PetStatusRef, UploadedFile};
use crate::presentation::dto::{PetRequestBody, PetView, UploadedFileView};

/// The status reference is flattened to its id
pub fn pet_to_view(pet: &Pet) -> PetView {
    PetView {
        id: pet.id,
        name: pet.name.clone(),
        pet_type: pet.pet_type,
        sex: pet.sex,
        description: pet.description.clone(),
        address: pet.address.clone(),
        pet_status: pet.pet_status.map(|status| status.id),
        image_url: pet.image_url.clone(),
        gallery: pet.gallery.iter().map(file_to_view).collect(),
        created: pet.created_at.timestamp_millis(),
        last_modified: pet.updated_at.timestamp_millis(),
    }
}

pub fn pets_to_views(pets: &[Pet]) -> Vec<PetView> {
    pets.iter().map(pet_to_view).collect()
}

pub fn request_to_draft(body: PetRequestBody) -> PetDraft {
    PetDraft {
        name: body.name,
        pet_type: body.pet_type,
        sex: body.sex,
        description: body.description,
        address: body.address,
        pet_status: body.pet_status.map(|id| PetStatusRef { id }),
    }
}

pub fn file_to_view(file: &UploadedFile) -> UploadedFileView {
    UploadedFileView {
        id: file.id,
        path: file.path.clone(),
        file_url: file.file_url.clone(),
        created: file.created_at.timestamp_millis(),
    }
}
