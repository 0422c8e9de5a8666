//! Presentation Layer
//!
//! HTTP handlers, DTOs, mappers and router.

pub mod dto;
pub mod handlers;
pub mod mapper;
pub mod router;

pub use handlers::PetsAppState;
pub use router::{pets_router, pets_router_generic};
