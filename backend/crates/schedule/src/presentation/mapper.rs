//! Entity <-> DTO conversion

use chrono::{DateTime, Utc};
use kernel::error::violation::FieldViolation;

use crate::application::ScheduleOutput;
use crate::domain::entities::{Reservation, ReservationDraft};
use crate::presentation::dto::{ReservationRequest, ReservationView, ScheduleView};

pub fn reservation_to_view(reservation: &Reservation) -> ReservationView {
    ReservationView {
        id: reservation.id,
        start_date: reservation.start.timestamp_millis(),
        end_date: reservation.end.timestamp_millis(),
        owner_id: reservation.owner_id,
        created: reservation.created_at.timestamp_millis(),
        last_modified: reservation.updated_at.timestamp_millis(),
    }
}

pub fn schedule_to_view(output: ScheduleOutput) -> ScheduleView {
    ScheduleView {
        reservations: output.reservations.iter().map(reservation_to_view).collect(),
        configs: output.configs,
    }
}

/// Epoch milliseconds outside chrono's range become a violation
pub fn request_to_draft(body: ReservationRequest) -> Result<ReservationDraft, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    let mut instant = |field: &'static str, millis: Option<i64>| -> Option<DateTime<Utc>> {
        let millis = millis?;
        let parsed = DateTime::from_timestamp_millis(millis);
        if parsed.is_none() {
            violations.push(FieldViolation::new(field, "is out of range"));
        }
        parsed
    };

    let start = instant("startDate", body.start_date);
    let end = instant("endDate", body.end_date);

    if violations.is_empty() {
        Ok(ReservationDraft {
            start,
            end,
            owner_id: body.owner_id,
        })
    } else {
        Err(violations)
    }
}
