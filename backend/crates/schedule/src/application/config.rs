//! Application Configuration

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

use crate::domain::day_config::{DayConfig, default_days};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid timezone offset '{0}' (expected 'Z' or '+HH:MM')")]
    InvalidOffset(String),

    #[error("Invalid day configuration: {0}")]
    InvalidDays(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Offset in which dates and opening periods are interpreted
    pub timezone_offset: FixedOffset,
    pub days: Vec<DayConfig>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone_offset: Utc.fix(),
            days: default_days(),
        }
    }
}

impl ScheduleConfig {
    /// `Z`, `+HH:MM` or `-HH:MM`
    pub fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("z") {
            return Ok(Utc.fix());
        }

        let invalid = || ConfigError::InvalidOffset(raw.to_string());
        let (sign, rest) = match raw.split_at_checked(1) {
            Some(("+", rest)) => (1, rest),
            Some(("-", rest)) => (-1, rest),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
    }

    /// Day configs as JSON: `[{"dayOfWeek":"MONDAY","periods":[...]}]`
    pub fn parse_days(json: &str) -> Result<Vec<DayConfig>, ConfigError> {
        let mut days: Vec<DayConfig> = serde_json::from_str(json)?;
        for day in &mut days {
            day.periods.sort_by_key(|period| period.period_start);
        }
        Ok(days)
    }
}
