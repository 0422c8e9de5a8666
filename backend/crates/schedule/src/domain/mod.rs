//! Domain Layer

pub mod day_config;
pub mod entities;
pub mod policy;
pub mod repository;
pub mod services;

pub use day_config::{DayConfig, DayOfWeek, Period};
pub use entities::{Reservation, ReservationDraft, ValidReservation};
pub use repository::{ReservationRepository, SlotWrite};
