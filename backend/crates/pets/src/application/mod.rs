//! Application Layer

pub mod config;
pub mod pet_command;
pub mod pet_image;
pub mod pet_query;

pub use config::PetsConfig;
pub use pet_command::PetCommandUseCase;
pub use pet_image::{ImageSlot, PetImageUseCase};
pub use pet_query::PetQueryUseCase;
