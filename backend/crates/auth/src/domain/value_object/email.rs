//! Email Value Object
//!
//! Sign-in identifier of a shelter user. Stored lower-cased.

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::violation::FieldViolation;
use serde::{Deserialize, Serialize};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> AppError {
    AppError::validation(vec![FieldViolation::new("email", message)])
}

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Trim, lower-case and validate a submitted address
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(invalid("must not be blank"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(invalid(format!(
                "must be at most {EMAIL_MAX_LENGTH} characters"
            )));
        }
        if !Self::is_well_formed(&email) {
            return Err(invalid("must be a well-formed email address"));
        }

        Ok(Self(email))
    }

    /// `local@domain.tld`; no second `@`, no dangling dots or hyphens in the domain
    fn is_well_formed(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        let local_ok = !local.is_empty() && local.len() <= 64;
        let domain_ok = domain.contains('.')
            && domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-']);

        local_ok && domain_ok
    }

    /// Rows in `users` were validated on the way in
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
