//! Reservation Access Policy
//!
//! Staff (SA, TOZ, VOLUNTEER) may read the schedule and book periods.
//! Volunteers see and book only their own reservations; SA and TOZ manage
//! everyone's.

use auth::{PermissionDenied, Principal, Role};
use kernel::id::UserId;

use crate::domain::entities::Reservation;

pub fn authorize_schedule_read(principal: &Principal) -> Result<(), PermissionDenied> {
    principal.require_any_role(&Role::STAFF)
}

pub fn authorize_reservation_view(
    principal: &Principal,
    reservation: &Reservation,
) -> Result<(), PermissionDenied> {
    principal.require_any_role(&Role::STAFF)?;

    if principal.is_admin() || principal.user_id() == Some(reservation.owner_id) {
        Ok(())
    } else {
        Err(PermissionDenied::requiring(&Role::ADMINS))
    }
}

/// Owner of a new reservation: the requested one, or the caller when omitted
pub fn resolve_owner(
    principal: &Principal,
    requested: Option<UserId>,
) -> Result<UserId, PermissionDenied> {
    principal.require_any_role(&Role::STAFF)?;

    let caller = principal.user_id();
    match (requested, caller) {
        (Some(owner), _) if principal.is_admin() => Ok(owner),
        (Some(owner), Some(caller)) if owner == caller => Ok(owner),
        (None, Some(caller)) => Ok(caller),
        _ => Err(PermissionDenied::requiring(&Role::ADMINS)),
    }
}

/// Update and delete
pub fn authorize_management(principal: &Principal) -> Result<(), PermissionDenied> {
    principal.require_any_role(&Role::ADMINS)
}
