//! Pets Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Pets, statuses, uploaded files, access policy, repository traits
//! - `application/` - Query, command and image use cases
//! - `infra/` - PostgreSQL repository, local file storage
//! - `presentation/` - HTTP handlers, DTOs, mappers, router
//!
//! ## Access Model
//! - Every role reads pets; incomplete records (missing name, type or sex)
//!   are visible to SA and TOZ only
//! - Create, update, delete and image operations require SA or TOZ

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::PetsConfig;
pub use error::{PetsError, PetsResult};
pub use infra::{PgLocalFileStorage, PgPetRepository};
pub use presentation::router::{pets_router, pets_router_generic};
