//! Reservation Command Use Case
//!
//! Checks run in a fixed order: roles, body, opening hours, owner, overlap.

use std::sync::Arc;

use auth::Principal;
use kernel::id::ReservationId;

use crate::application::config::ScheduleConfig;
use crate::domain::entities::{Reservation, ReservationDraft, ValidReservation};
use crate::domain::policy;
use crate::domain::repository::{ReservationRepository, SlotWrite};
use crate::domain::services;
use crate::error::{ScheduleError, ScheduleResult};

pub struct ReservationCommandUseCase<R>
where
    R: ReservationRepository,
{
    repo: Arc<R>,
    config: Arc<ScheduleConfig>,
}

impl<R> ReservationCommandUseCase<R>
where
    R: ReservationRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ScheduleConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        draft: ReservationDraft,
    ) -> ScheduleResult<Reservation> {
        let owner_id = policy::resolve_owner(principal, draft.owner_id)?;
        let valid = self.validate(&draft)?;

        if !self.repo.owner_exists(&owner_id).await? {
            return Err(ScheduleError::OwnerNotFound(owner_id));
        }

        let reservation = Reservation::new(owner_id, valid.start, valid.end);
        match self.repo.create(&reservation).await? {
            SlotWrite::Saved => {}
            SlotWrite::Overlaps => return Err(ScheduleError::Overlap),
            SlotWrite::Missing => {
                return Err(ScheduleError::Internal("Insert reported a missing row".into()));
            }
        }

        tracing::info!(
            reservation_id = %reservation.id,
            owner_id = %owner_id,
            start = %reservation.start,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Reschedule; an omitted owner keeps the current one
    pub async fn update(
        &self,
        principal: &Principal,
        id: ReservationId,
        draft: ReservationDraft,
    ) -> ScheduleResult<Reservation> {
        policy::authorize_management(principal)?;
        let valid = self.validate(&draft)?;

        let mut reservation = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(ScheduleError::ReservationNotFound(id))?;

        let owner_id = valid.owner_id.unwrap_or(reservation.owner_id);
        if !self.repo.owner_exists(&owner_id).await? {
            return Err(ScheduleError::OwnerNotFound(owner_id));
        }

        reservation.reschedule(owner_id, valid.start, valid.end);
        match self.repo.update(&reservation).await? {
            SlotWrite::Saved => {}
            SlotWrite::Overlaps => return Err(ScheduleError::Overlap),
            SlotWrite::Missing => return Err(ScheduleError::ReservationNotFound(id)),
        }

        tracing::info!(reservation_id = %id, "Reservation updated");
        Ok(reservation)
    }

    /// Returns the removed reservation
    pub async fn delete(
        &self,
        principal: &Principal,
        id: ReservationId,
    ) -> ScheduleResult<Reservation> {
        policy::authorize_management(principal)?;

        let removed = self
            .repo
            .delete(&id)
            .await?
            .ok_or(ScheduleError::ReservationNotFound(id))?;

        tracing::info!(reservation_id = %id, "Reservation removed");
        Ok(removed)
    }

    /// Field checks, then the opening-hours check
    fn validate(&self, draft: &ReservationDraft) -> ScheduleResult<ValidReservation> {
        let valid = draft.validate().map_err(ScheduleError::Validation)?;

        if !services::fits_period(
            valid.start,
            valid.end,
            self.config.timezone_offset,
            &self.config.days,
        ) {
            return Err(ScheduleError::OutsideOpeningHours);
        }

        Ok(valid)
    }
}
