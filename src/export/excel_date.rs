// src/export/excel_date.rs

use crate::utils::time::{MILLIS_PER_DAY, millis_of_day};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Days from 0001-01-01 (day 1) to the spreadsheet epoch 1899-12-30.
const EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// Spreadsheet serial of a date (whole days since 1899-12-30).
pub fn date_to_serial(d: &NaiveDate) -> f64 {
    (d.num_days_from_ce() - EPOCH_DAYS_FROM_CE) as f64
}

/// Spreadsheet serial of an instant, millisecond precision.
pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    date_to_serial(&dt.date()) + millis_of_day(dt) as f64 / MILLIS_PER_DAY as f64
}

/// Inverse of [`datetime_to_serial`], rounded to the millisecond.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    let ms = ((serial - days) * MILLIS_PER_DAY as f64).round() as i64;

    let date = NaiveDate::from_num_days_from_ce_opt(days as i32 + EPOCH_DAYS_FROM_CE)?;
    Some(date.and_time(NaiveTime::MIN) + Duration::milliseconds(ms))
}
