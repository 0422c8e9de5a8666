//! Infrastructure Layer

pub mod postgres;
pub mod storage;

pub use postgres::PgPetRepository;
pub use storage::PgLocalFileStorage;
