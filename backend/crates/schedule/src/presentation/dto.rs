//! API DTOs (Data Transfer Objects)

use kernel::id::{ReservationId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::day_config::DayConfig;

/// Body of `POST /schedule` and `PUT /schedule/{id}`; instants in epoch ms
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub owner_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: ReservationId,
    pub start_date: i64,
    pub end_date: i64,
    pub owner_id: UserId,
    pub created: i64,
    pub last_modified: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub reservations: Vec<ReservationView>,
    pub configs: Vec<DayConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}
