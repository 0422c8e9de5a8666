//! User Entity
//!
//! Shelter staff account. Accounts and role assignments are maintained
//! outside this service; the auth crate only reads them.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::principal::Principal;
use crate::domain::value_object::{email::Email, role::Role};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub forename: String,
    pub surname: String,
    pub roles: Vec<Role>,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user without any role cannot act in the system
    pub fn can_sign_in(&self) -> bool {
        self.roles.iter().any(|role| *role != Role::Anonymous)
    }

    pub fn principal(&self) -> Principal {
        Principal::authenticated(self.id, self.roles.iter().copied())
    }
}
