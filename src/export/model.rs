// src/export/model.rs

use crate::models::history_entry::HistoryEntry;
use crate::models::schedule_row::ScheduleRow;
use crate::utils::sanitize::escape_formula;
use crate::utils::time::format_instant;
use serde::Serialize;

/// Flat row for the CSV / JSON exports: one per schedule row.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RowExport {
    /// 1-based run number, oldest first
    pub run: usize,
    pub operation: usize,
    pub confirmation: String,
    pub name: String,
    pub worker: String,
    pub posting_date: String,
    pub pause_minutes: f64,
    pub duration: f64,
    pub unit: String,
    pub start: String,
    pub end: String,
    pub lunch: bool,
    pub chained: bool,
    pub mode: String,
}

fn to_export(run: usize, entry: &HistoryEntry, r: &ScheduleRow) -> RowExport {
    RowExport {
        run,
        operation: r.operation,
        confirmation: escape_formula(&r.confirmation),
        name: escape_formula(&r.name),
        worker: escape_formula(&r.worker_label),
        posting_date: r.posting_date.format("%Y-%m-%d").to_string(),
        pause_minutes: r.pause_minutes,
        duration: r.duration,
        unit: r.unit.as_str().to_string(),
        start: format_instant(&r.start),
        end: format_instant(&r.end),
        lunch: r.crossed_lunch,
        chained: entry.is_chained(),
        mode: entry.mode.as_str().to_string(),
    }
}

/// Flatten `entries` (given oldest first).
pub fn flatten(entries: &[HistoryEntry]) -> Vec<RowExport> {
    entries
        .iter()
        .enumerate()
        .flat_map(|(i, e)| e.rows.iter().map(move |r| to_export(i + 1, e, r)))
        .collect()
}
