//! Re-evaluates the worksheet formulas and compares them with the stored
//! schedule rows.

use crate::core::report::LUNCH_ICON;
use crate::export::excel_date::{datetime_to_serial, serial_to_datetime};
use crate::export::formula::eval::{Evaluator, Value};
use crate::export::sheet::{Worksheet, col};
use crate::models::history_entry::HistoryEntry;
use crate::utils::time::format_instant;

/// One second, as a day fraction.
pub const TOLERANCE: f64 = 1.0 / 86_400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// 1-based row in the worksheet
    pub sheet_row: u32,
    /// 0-based history entry (chronological) and schedule row
    pub entry: usize,
    pub row: usize,
    pub column: &'static str,
    pub expected: String,
    pub actual: String,
}

/// Check Start, End and Lunch of every data row whose cached values come
/// from the stored schedule. Rows recomputed from the sheet are skipped.
pub fn verify(sheet: &Worksheet, entries: &[HistoryEntry]) -> Vec<Mismatch> {
    let mut eval = Evaluator::new(sheet);
    let mut out = Vec::new();

    for (n, data) in sheet.data_rows() {
        let Some(src) = data.source else { continue };
        if src.reconciled {
            continue;
        }
        let Some(row) = entries.get(src.entry).and_then(|e| e.rows.get(src.row)) else {
            continue;
        };

        let mut mismatch = |column: &'static str, expected: String, actual: String| {
            out.push(Mismatch {
                sheet_row: n,
                entry: src.entry,
                row: src.row,
                column,
                expected,
                actual,
            });
        };

        for (column, c, expected) in [
            ("Start", col::START, &row.start),
            ("End", col::END, &row.end),
        ] {
            let got = eval.cell(n, c);
            let want = datetime_to_serial(expected);
            match got.as_number() {
                Some(v) if (v - want).abs() <= TOLERANCE => {}
                _ => mismatch(column, format_instant(expected), describe(&got)),
            }
        }

        let icon = eval.cell(n, col::LUNCH);
        let crossed = icon.as_text().is_some_and(|s| s == LUNCH_ICON);
        if crossed != row.crossed_lunch {
            mismatch("Lunch", icon_text(row.crossed_lunch).into(), describe(&icon));
        }
    }

    out
}

fn icon_text(b: bool) -> &'static str {
    if b { LUNCH_ICON } else { "(none)" }
}

fn describe(v: &Value) -> String {
    match v {
        Value::Number(n) => match serial_to_datetime(*n) {
            Some(dt) => format_instant(&dt),
            None => n.to_string(),
        },
        Value::Text(s) if s.is_empty() => "(none)".to_string(),
        Value::Text(s) => s.clone(),
        Value::Bool(b) => b.to_string().to_uppercase(),
        Value::Error(e) => (*e).to_string(),
        Value::Empty => "(empty)".to_string(),
    }
}
