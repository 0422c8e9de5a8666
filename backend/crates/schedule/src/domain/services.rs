//! Domain Services
//!
//! Calendar arithmetic in the configured timezone offset.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};

use crate::domain::day_config::{DayConfig, DayOfWeek};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` query value; the error names the parameter
pub fn parse_date(name: &str, value: Option<&str>) -> Result<NaiveDate, String> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Parameter '{name}' is required (format: yyyy-MM-dd)"))?;

    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("Parameter '{name}' must be a date in format yyyy-MM-dd"))
}

/// `[from 00:00, to + 1 day 00:00)` in `offset`, as UTC instants
pub fn day_range(
    from: NaiveDate,
    to: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), String> {
    if from > to {
        return Err("Parameter 'from' must not be after 'to'".to_string());
    }

    let day_after = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| "Parameter 'to' is out of range".to_string())?;

    let start = local_midnight(from, offset)?;
    let end = local_midnight(day_after, offset)?;
    Ok((start, end))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>, String> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(offset).single())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("Date {date} is out of range"))
}

/// Whether `[start, end)` is exactly one configured period of its local day
pub fn fits_period(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
    days: &[DayConfig],
) -> bool {
    let local_start = start.with_timezone(&offset);
    let local_end = end.with_timezone(&offset);

    if local_start.date_naive() != local_end.date_naive() {
        return false;
    }

    let weekday = DayOfWeek::from(local_start.weekday());
    days.iter()
        .filter(|day| day.day_of_week == weekday)
        .flat_map(|day| day.periods.iter())
        .any(|period| {
            period.period_start == local_start.time() && period.period_end == local_end.time()
        })
}
