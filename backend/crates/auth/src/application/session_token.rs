//! Session Token
//!
//! `"{session_id}.{base64url(HMAC-SHA256(session_id))}"`

use platform::crypto::{sign_token, verify_token};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

pub fn issue(secret: &[u8], session_id: Uuid) -> String {
    sign_token(secret, &session_id.to_string())
}

/// Verify the signature and recover the session id
pub fn parse(secret: &[u8], token: &str) -> AuthResult<Uuid> {
    verify_token(secret, token)
        .ok_or(AuthError::SessionInvalid)?
        .parse()
        .map_err(|_| AuthError::SessionInvalid)
}
