//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Roles, principal, users, sessions, repository traits
//! - `application/` - Use cases, session tokens, the exempt-path matcher
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign-in with email + password, sign-out, session status
//! - Server-side sessions referenced by an HMAC-signed token
//!   (HttpOnly cookie or `Authorization: Bearer`)
//! - Middleware that attaches a [`Principal`] to every request and rejects
//!   protected paths without a session
//! - Roles SA, TOZ, VOLUNTEER and ANONYMOUS
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Roles are read from the user record on every request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::request_matcher::AuthenticationRequestMatcher;
pub use domain::entity::principal::{PermissionDenied, Principal};
pub use domain::value_object::role::Role;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, with_authentication};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
