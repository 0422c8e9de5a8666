//! Auth Middleware
//!
//! Resolves the [`Principal`] of every request and stores it in the request
//! extensions. Paths outside the exemption list require a valid session.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{AuthenticationRequestMatcher, CheckSessionUseCase};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub matcher: Arc<AuthenticationRequestMatcher>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let matcher = AuthenticationRequestMatcher::new(&config.skip_paths);
        Self {
            repo,
            config,
            matcher: Arc::new(matcher),
        }
    }
}

/// Session token from the cookie, else from `Authorization: Bearer`
pub fn request_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| platform::cookie::extract_bearer_token(headers))
}

/// Attach a [`Principal`] to the request, rejecting unauthenticated access
/// to protected paths with 401
pub async fn authenticate<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let requires_auth = state.matcher.requires_authentication(req.uri().path());
    let token = request_token(req.headers(), &state.config.session_cookie_name);

    let resolved = match token {
        Some(token) => {
            let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
            match use_case.resolve(&token).await {
                Ok(principal) => Some(principal),
                Err(AuthError::SessionInvalid) => None,
                Err(e) => return e.into_response(),
            }
        }
        None => None,
    };

    let principal = match resolved {
        Some(principal) => principal,
        None if requires_auth => {
            tracing::debug!(path = %req.uri().path(), "No valid session for protected path");
            return AuthError::AuthenticationRequired.into_response();
        }
        None => Principal::anonymous(),
    };

    req.extensions_mut().insert(principal);
    next.run(req).await
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::AuthenticationRequired)
    }
}
