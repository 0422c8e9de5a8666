//! Pet Access Policy
//!
//! Every role may read pets. Incomplete records are visible to SA and TOZ
//! only: listings leave them out for everyone else and a direct fetch is
//! refused. Mutations are SA/TOZ only.

use auth::{PermissionDenied, Principal, Role};

use crate::domain::entities::Pet;

/// Which records a listing may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    All,
    CompleteOnly,
}

pub fn listing_scope(principal: &Principal) -> ListingScope {
    if principal.is_admin() {
        ListingScope::All
    } else {
        ListingScope::CompleteOnly
    }
}

/// Single-record read
// TODO: let non-admins see incomplete pets whose status is public once the
// mobile clients handle such records.
pub fn authorize_view(principal: &Principal, pet: &Pet) -> Result<(), PermissionDenied> {
    if principal.is_admin() || pet.is_complete() {
        Ok(())
    } else {
        Err(PermissionDenied::requiring(&Role::ADMINS))
    }
}

/// Create, update, delete and image operations
pub fn authorize_mutation(principal: &Principal) -> Result<(), PermissionDenied> {
    principal.require_any_role(&Role::ADMINS)
}
