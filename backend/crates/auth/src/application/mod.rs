//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod request_matcher;
pub mod session_token;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use request_matcher::AuthenticationRequestMatcher;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
