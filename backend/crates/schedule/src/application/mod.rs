//! Application Layer

pub mod config;
pub mod reservation_command;
pub mod schedule_query;

pub use config::ScheduleConfig;
pub use reservation_command::ReservationCommandUseCase;
pub use schedule_query::{ScheduleOutput, ScheduleQuery, ScheduleQueryUseCase};
