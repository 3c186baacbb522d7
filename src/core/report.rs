//! Row/report materializer: schedule rows → table lines, the five narrative
//! report lines, and the history entry of the run.

use crate::core::calculator::timeline::Schedule;
use crate::models::history_entry::HistoryEntry;
use crate::models::operation::OperationDefinition;
use crate::models::run_config::RunConfig;
use crate::models::schedule_row::ScheduleRow;
use crate::utils::colors::{colorize_lunch, colorize_optional};
use crate::utils::formatting::format_amount;
use crate::utils::sanitize::{clean_numeric, clean_text};
use crate::utils::table::Table;
use crate::utils::time::format_instant;

/// Marker for rows that needed lunch compensation (also used in the sheet).
pub const LUNCH_ICON: &str = "🍽";

/// Default cap (chars) of each free-text report field.
pub const DEFAULT_TEXT_LIMIT: usize = 255;

/// Length cap of the two measurement fields.
const MEASUREMENT_LIMIT: usize = 32;

const NONE: &str = "-";

/// Free-text fields of the narrative report, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFields {
    pub pre_work_status: String,
    pub extra_work: String,
    pub measurement_a: String,
    pub measurement_b: String,
    pub deviations: String,
}

fn or_none(s: String) -> String {
    if s.is_empty() { NONE.to_string() } else { s }
}

/// Build the five report lines. Each field is filtered and capped on its own
/// before substitution; planned work lists every operation name in order.
pub fn build_report(ops: &[OperationDefinition], fields: &ReportFields, limit: usize) -> Vec<String> {
    let planned = ops
        .iter()
        .map(|op| op.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let status = or_none(clean_text(&fields.pre_work_status, limit));
    let extra = or_none(clean_text(&fields.extra_work, limit));
    let m_a = or_none(clean_numeric(&fields.measurement_a, MEASUREMENT_LIMIT));
    let m_b = or_none(clean_numeric(&fields.measurement_b, MEASUREMENT_LIMIT));
    let deviations = or_none(clean_text(&fields.deviations, limit));

    vec![
        format!("Pre-work status: {status}"),
        format!("Completed planned work: {}", or_none(planned)),
        format!("Completed extra work: {extra}"),
        format!("Measurement results: {m_a} / {m_b}"),
        format!("Deviations and recommendations: {deviations}"),
    ]
}

pub const TABLE_HEADERS: [&str; 10] = [
    "No.", "Conf.", "Operation", "Worker", "Pause", "Duration", "Start", "End", "Lunch", "Posting",
];

/// Plain (uncolored) cells of one displayed row.
pub fn display_cells(row: &ScheduleRow) -> Vec<String> {
    vec![
        row.operation.to_string(),
        row.confirmation.clone(),
        row.name.clone(),
        row.worker_label.clone(),
        row.pause_text.clone(),
        format_amount(row.duration, row.unit),
        format_instant(&row.start),
        format_instant(&row.end),
        if row.crossed_lunch { LUNCH_ICON.to_string() } else { String::new() },
        row.posting_date.format("%Y-%m-%d").to_string(),
    ]
}

pub fn table_rows(rows: &[ScheduleRow]) -> Vec<Vec<String>> {
    rows.iter().map(display_cells).collect()
}

/// Terminal table with colored lunch markers.
pub fn render_table(rows: &[ScheduleRow]) -> String {
    let mut table = Table::with_headers(&TABLE_HEADERS);
    for row in rows {
        let mut cells = display_cells(row);
        cells[4] = colorize_optional(&cells[4]);
        cells[8] = colorize_lunch(row.crossed_lunch, LUNCH_ICON);
        table.add_row(cells);
    }
    table.render()
}

/// Snapshot of a finished run.
pub fn make_entry(schedule: &Schedule, cfg: &RunConfig, report: Vec<String>, created_at: String) -> HistoryEntry {
    HistoryEntry {
        id: None,
        created_at,
        start: schedule.start,
        end: schedule.end,
        start_source: cfg.start_source,
        chain_mode: cfg.chain_mode,
        mode: cfg.mode,
        workers: cfg.workers,
        lunch: cfg.lunch.clone(),
        rows: schedule.rows.clone(),
        report,
    }
}

/// New history list with `entry` in front (most recent first).
pub fn prepend(history: Vec<HistoryEntry>, entry: HistoryEntry) -> Vec<HistoryEntry> {
    let mut out = Vec::with_capacity(history.len() + 1);
    out.push(entry);
    out.extend(history);
    out
}
