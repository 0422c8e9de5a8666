//! Shelter roles

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Role held by a principal
///
/// `SuperAdmin` and `Toz` are the administrative roles.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    #[display("SA")]
    #[serde(rename = "SA")]
    SuperAdmin,
    #[display("TOZ")]
    #[serde(rename = "TOZ")]
    Toz,
    #[display("VOLUNTEER")]
    #[serde(rename = "VOLUNTEER")]
    Volunteer,
    #[display("ANONYMOUS")]
    #[serde(rename = "ANONYMOUS")]
    Anonymous,
}

impl Role {
    pub const ADMINS: [Role; 2] = [Role::SuperAdmin, Role::Toz];
    pub const STAFF: [Role; 3] = [Role::SuperAdmin, Role::Toz, Role::Volunteer];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SA",
            Role::Toz => "TOZ",
            Role::Volunteer => "VOLUNTEER",
            Role::Anonymous => "ANONYMOUS",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SA" => Some(Role::SuperAdmin),
            "TOZ" => Some(Role::Toz),
            "VOLUNTEER" => Some(Role::Volunteer),
            "ANONYMOUS" => Some(Role::Anonymous),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Toz)
    }
}
