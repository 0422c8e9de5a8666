//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::error::violation::{FieldViolation, Violations};
use kernel::id::{ReservationId, UserId};

/// A booked shelter period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub owner_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(owner_id: UserId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: ReservationId::new(),
            owner_id,
            start,
            end,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reschedule(&mut self, owner_id: UserId, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.owner_id = owner_id;
        self.start = start;
        self.end = end;
        self.updated_at = Utc::now();
    }

    /// Half-open interval intersection
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

/// Submitted reservation, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub owner_id: Option<UserId>,
}

/// Draft with both instants present and ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidReservation {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub owner_id: Option<UserId>,
}

impl ReservationDraft {
    pub fn validate(&self) -> Result<ValidReservation, Vec<FieldViolation>> {
        let mut violations = Violations::new();
        violations.check(self.start.is_some(), "startDate", "must not be null");
        violations.check(self.end.is_some(), "endDate", "must not be null");
        if let (Some(start), Some(end)) = (self.start, self.end) {
            violations.check(start < end, "endDate", "must be after startDate");
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Ok(ValidReservation {
                start,
                end,
                owner_id: self.owner_id,
            }),
            _ => Err(violations.into_result().err().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 5, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_overlap_is_half_open() {
        let reservation = Reservation::new(UserId::new(), at(8), at(10));
        assert!(reservation.overlaps(at(9), at(11)));
        assert!(reservation.overlaps(at(7), at(9)));
        assert!(!reservation.overlaps(at(10), at(12)));
        assert!(!reservation.overlaps(at(6), at(8)));
    }

    #[test]
    fn test_draft_validation() {
        let draft = ReservationDraft::default();
        let fields: Vec<_> = draft
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["startDate", "endDate"]);

        let reversed = ReservationDraft {
            start: Some(at(10)),
            end: Some(at(8)),
            owner_id: None,
        };
        let violations = reversed.validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "endDate");

        let valid = ReservationDraft {
            start: Some(at(8)),
            end: Some(at(10)),
            owner_id: None,
        };
        assert_eq!(valid.validate().unwrap().end, at(10));
    }
}
