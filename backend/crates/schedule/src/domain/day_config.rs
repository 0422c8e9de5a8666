//! Opening Hours
//!
//! Which periods can be reserved on each day of the week. Times are local
//! to the configured timezone offset.

use chrono::{NaiveTime, Weekday};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    #[display("MONDAY")]
    Monday,
    #[display("TUESDAY")]
    Tuesday,
    #[display("WEDNESDAY")]
    Wednesday,
    #[display("THURSDAY")]
    Thursday,
    #[display("FRIDAY")]
    Friday,
    #[display("SATURDAY")]
    Saturday,
    #[display("SUNDAY")]
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// One reservable slot, `HH:MM` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(with = "hh_mm")]
    pub period_start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub period_end: NaiveTime,
}

impl Period {
    pub fn new(period_start: NaiveTime, period_end: NaiveTime) -> Self {
        Self {
            period_start,
            period_end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayConfig {
    pub day_of_week: DayOfWeek,
    /// Ordered by start time
    pub periods: Vec<Period>,
}

/// Monday to Sunday, two-hour periods from 08:00 to 18:00
pub fn default_days() -> Vec<DayConfig> {
    let periods: Vec<Period> = (8..18)
        .step_by(2)
        .filter_map(|hour| {
            Some(Period::new(
                NaiveTime::from_hms_opt(hour, 0, 0)?,
                NaiveTime::from_hms_opt(hour + 2, 0, 0)?,
            ))
        })
        .collect();

    DayOfWeek::ALL
        .into_iter()
        .map(|day_of_week| DayConfig {
            day_of_week,
            periods: periods.clone(),
        })
        .collect()
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}
