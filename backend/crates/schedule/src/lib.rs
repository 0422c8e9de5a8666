//! Schedule Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Reservations, opening hours, access policy, repository trait
//! - `application/` - Schedule query and reservation command use cases
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, mappers, router
//!
//! ## Reservation Rules
//! - A reservation covers exactly one configured period of one local day
//! - Reservations never overlap
//! - Volunteers book and read their own reservations; SA and TOZ manage all

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{ConfigError, ScheduleConfig};
pub use error::{ScheduleError, ScheduleResult};
pub use infra::PgScheduleRepository;
pub use presentation::router::{schedule_router, schedule_router_generic};
