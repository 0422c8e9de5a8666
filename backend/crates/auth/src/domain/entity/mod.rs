//! Entities

pub mod auth_session;
pub mod principal;
pub mod user;
