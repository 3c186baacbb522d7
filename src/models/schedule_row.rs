use super::duration_unit::DurationUnit;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One (operation, worker) line of a computed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based operation ordinal
    pub operation: usize,
    pub confirmation: String,
    pub name: String,
    /// 1-based worker index
    pub worker: usize,
    pub worker_label: String,
    /// Clock after the pause, before lunch compensation.
    pub planned_start: NaiveDateTime,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub crossed_lunch: bool,
    /// Nominal pause in minutes (kept even when it did not move the clock).
    pub pause_minutes: f64,
    pub pause_text: String,
    /// Nominal pause as a day fraction, for spreadsheet arithmetic.
    pub pause_fraction: f64,
    /// Display duration in `unit`.
    pub duration: f64,
    pub unit: DurationUnit,
    pub posting_date: NaiveDate,
}

impl ScheduleRow {
    /// True when both rows belong to the same operation group.
    pub fn same_operation(&self, other: &ScheduleRow) -> bool {
        self.operation == other.operation
    }

    /// Key used by per-worker lookups: `operation_worker`.
    pub fn lookup_key(&self) -> String {
        lookup_key(self.operation, self.worker)
    }
}

pub fn lookup_key(operation: usize, worker: usize) -> String {
    format!("{operation}_{worker}")
}
