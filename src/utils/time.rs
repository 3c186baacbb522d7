//! Time utilities: parsing HH:MM, start instants, minute <-> duration conversions.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

/// Combine a date string and a time string into the run start instant.
/// Both are mandatory: a missing part is reported as `MissingStart`.
pub fn parse_start(date: Option<&str>, time: Option<&str>) -> AppResult<NaiveDateTime> {
    let date = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(AppError::MissingStart("date"))?;
    let time = time
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingStart("time"))?;

    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(date.to_string()))?;
    let t = parse_time(time).ok_or_else(|| AppError::InvalidTime(time.to_string()))?;

    Ok(d.and_time(t))
}

/// Parse a stored instant (`YYYY-MM-DDTHH:MM[:SS]`).
pub fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

/// Fractional minutes → chrono duration, rounded to the millisecond.
pub fn minutes_to_duration(minutes: f64) -> Duration {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Milliseconds elapsed since midnight of the instant's own day.
pub fn millis_of_day(dt: &NaiveDateTime) -> i64 {
    let t = dt.time();
    t.num_seconds_from_midnight() as i64 * 1000 + (t.nanosecond() / 1_000_000) as i64
}

/// Minutes as a spreadsheet day fraction.
pub fn minutes_to_day_fraction(minutes: f64) -> f64 {
    minutes / MINUTES_PER_DAY
}

pub fn format_instant(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}
