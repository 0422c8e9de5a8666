//! Schedule Query Use Case

use std::sync::Arc;

use auth::Principal;
use kernel::id::ReservationId;

use crate::application::config::ScheduleConfig;
use crate::domain::day_config::DayConfig;
use crate::domain::entities::Reservation;
use crate::domain::policy;
use crate::domain::repository::ReservationRepository;
use crate::domain::services;
use crate::error::{ScheduleError, ScheduleResult};

/// Raw `from` / `to` query values (`YYYY-MM-DD`)
#[derive(Debug, Clone, Default)]
pub struct ScheduleQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub struct ScheduleOutput {
    pub reservations: Vec<Reservation>,
    pub configs: Vec<DayConfig>,
}

pub struct ScheduleQueryUseCase<R>
where
    R: ReservationRepository,
{
    repo: Arc<R>,
    config: Arc<ScheduleConfig>,
}

impl<R> ScheduleQueryUseCase<R>
where
    R: ReservationRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ScheduleConfig>) -> Self {
        Self { repo, config }
    }

    /// Reservations of the local days `from..=to` plus the opening hours
    pub async fn schedule(
        &self,
        principal: &Principal,
        query: ScheduleQuery,
    ) -> ScheduleResult<ScheduleOutput> {
        policy::authorize_schedule_read(principal)?;

        let from = services::parse_date("from", query.from.as_deref())
            .map_err(ScheduleError::InvalidArgument)?;
        let to = services::parse_date("to", query.to.as_deref())
            .map_err(ScheduleError::InvalidArgument)?;
        let (start, end) = services::day_range(from, to, self.config.timezone_offset)
            .map_err(ScheduleError::InvalidArgument)?;

        let reservations = self.repo.find_between(start, end).await?;
        tracing::debug!(%from, %to, count = reservations.len(), "Schedule loaded");

        Ok(ScheduleOutput {
            reservations,
            configs: self.config.days.clone(),
        })
    }

    pub async fn get(&self, principal: &Principal, id: ReservationId) -> ScheduleResult<Reservation> {
        policy::authorize_schedule_read(principal)?;

        let reservation = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(ScheduleError::ReservationNotFound(id))?;

        policy::authorize_reservation_view(principal, &reservation)?;

        Ok(reservation)
    }
}
