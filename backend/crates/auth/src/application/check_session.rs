//! Check Session Use Case
//!
//! Turns a presented session token into the [`Principal`] the request acts as.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

pub struct CheckSessionUseCase<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> CheckSessionUseCase<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Resolve the principal behind `session_token`
    ///
    /// Roles come from the user record, so a role change applies to live
    /// sessions on their next request.
    pub async fn resolve(&self, session_token: &str) -> AuthResult<Principal> {
        let session_id = session_token::parse(&self.config.session_secret, session_token)?;

        let mut session = AuthSessionRepository::find_by_id(&*self.repo, session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.repo.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let user = UserRepository::find_by_id(&*self.repo, &session.user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if !user.can_sign_in() {
            return Err(AuthError::SessionInvalid);
        }

        // Update last activity in background
        session.touch();
        let repo = self.repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.touch(&session).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(user.principal())
    }
}
