//! Repository Traits

use chrono::{DateTime, Utc};
use kernel::id::{ReservationId, UserId};

use crate::domain::entities::Reservation;
use crate::error::ScheduleResult;

/// Outcome of a write that must not overlap other reservations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotWrite {
    Saved,
    Overlaps,
    /// Only for updates: the reservation vanished meanwhile
    Missing,
}

#[trait_variant::make(ReservationRepository: Send)]
pub trait LocalReservationRepository {
    /// Reservations starting in `[from, to)`, ordered by start
    async fn find_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Reservation>>;

    async fn find_by_id(&self, id: &ReservationId) -> ScheduleResult<Option<Reservation>>;

    /// Insert unless the interval overlaps an existing reservation
    async fn create(&self, reservation: &Reservation) -> ScheduleResult<SlotWrite>;

    /// Update unless the new interval overlaps another reservation
    async fn update(&self, reservation: &Reservation) -> ScheduleResult<SlotWrite>;

    /// The removed reservation, if there was one
    async fn delete(&self, id: &ReservationId) -> ScheduleResult<Option<Reservation>>;

    async fn owner_exists(&self, owner_id: &UserId) -> ScheduleResult<bool>;
}
