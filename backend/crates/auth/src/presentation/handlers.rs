//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::error::app_error::AppError;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{SignInInput, SignInUseCase, SignOutUseCase};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{SessionStatusResponse, SignInRequest, SignInResponse};
use crate::presentation::middleware::request_token;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let remember_me = req.remember_me;

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
            remember_me,
        })
        .await?;

    let cookie = state
        .config
        .cookie(remember_me)
        .set_cookie_header(&output.session_token)
        .ok_or_else(|| AuthError::Internal("Session token is not a valid header value".into()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            user_id: output.user_id,
            roles: output.roles,
            token: output.session_token,
            expires_at_ms: output.expires_at_ms,
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /auth/signout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = request_token(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign-out with an unusable session token");
        }
    }

    let cookie = state
        .config
        .cookie(false)
        .delete_cookie_header()
        .ok_or_else(|| AuthError::Internal("Cookie name is not a valid header value".into()))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /auth/status
pub async fn session_status(principal: Principal) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse {
        authenticated: !principal.is_anonymous(),
        user_id: principal.user_id(),
        roles: principal.roles().iter().copied().collect(),
    })
}
