//! Value Object Module

pub mod email;
pub mod role;

pub use email::Email;
pub use role::Role;
