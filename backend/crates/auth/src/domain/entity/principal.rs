//! Principal
//!
//! The identity a request acts as: a signed-in user with their roles, or
//! the anonymous caller.

use std::collections::BTreeSet;

use kernel::id::UserId;
use thiserror::Error;

use crate::domain::value_object::role::Role;

/// Raised when a principal lacks every role an operation accepts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Access denied: requires one of [{}]", required_roles(.required))]
pub struct PermissionDenied {
    pub required: Vec<Role>,
}

fn required_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::code)
        .collect::<Vec<_>>()
        .join(", ")
}

impl PermissionDenied {
    pub fn requiring(roles: &[Role]) -> Self {
        Self {
            required: roles.to_vec(),
        }
    }
}

/// Identity attached to every request by the authentication middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: Option<UserId>,
    roles: BTreeSet<Role>,
}

impl Principal {
    /// The unauthenticated caller: no user id, role ANONYMOUS only
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            roles: BTreeSet::from([Role::Anonymous]),
        }
    }

    pub fn authenticated(user_id: UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id: Some(user_id),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    /// SA or TOZ
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    pub fn require_any_role(&self, roles: &[Role]) -> Result<(), PermissionDenied> {
        if self.has_any_role(roles) {
            Ok(())
        } else {
            Err(PermissionDenied::requiring(roles))
        }
    }
}
