//! Domain Layer

pub mod entities;
pub mod policy;
pub mod repository;
pub mod value_objects;

pub use entities::{Pet, PetDraft, PetStatus, PetStatusRef, UploadedFile};
pub use repository::{FileStorage, PetRepository, PetStatusRepository};
pub use value_objects::{PetType, Sex};
