//! Lays the history out as one worksheet whose formulas recompute the
//! schedule.
//!
//! Each entry becomes a block: title, header, one data row per schedule row,
//! the report lines, a blank separator. Start/End/Lunch of every data row are
//! formulas; Base (column 13) links a row to the end of the previous
//! operation, to the previous entry's block for chained runs, or to the
//! worker's own previous operation in `individual` mode.

use crate::core::calculator::LunchSchedule;
use crate::core::report::LUNCH_ICON;
use crate::export::excel_date::{date_to_serial, datetime_to_serial};
use crate::export::formula::eval::Evaluator;
use crate::export::formula::rules::{elapsed_formula, end_formula, icon_formula, start_formula};
use crate::export::formula::{CellRef, Expr, Func};
use crate::export::sheet::{
    Cell, CellStyle, CellValue, HEADERS, LAST_VISIBLE, RowKind, RowSource, SheetRow, Worksheet, col,
};
use crate::models::history_entry::HistoryEntry;
use crate::models::schedule_row::{ScheduleRow, lookup_key};
use crate::utils::time::{format_instant, minutes_to_day_fraction};

pub const SHEET_NAME: &str = "Schedule";

/// Rows between the last data row of a block and the first of the next one,
/// not counting the report lines: blank, title, header, and the row itself.
pub const BLOCK_GAP: usize = 4;

/// How the first data row of a block obtains its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Literal start values, editable by the reader.
    Literal,
    /// `R[-k]C10+RC6`: continues from the previous block.
    Chained { offset: usize },
}

/// Build the worksheet for `entries` given oldest first.
pub fn build_worksheet(entries: &[HistoryEntry]) -> Worksheet {
    let mut sheet = Worksheet::new(SHEET_NAME);
    let mut prev: Option<(&HistoryEntry, bool)> = None;

    for (index, entry) in entries.iter().enumerate() {
        let anchor = match prev {
            Some((p, _)) if continues_from(entry, p) => Anchor::Chained {
                offset: p.report.len() + BLOCK_GAP,
            },
            _ => Anchor::Literal,
        };

        // values that cannot come from the stored schedule
        let reconciled = entry.mode.is_individual()
            || matches!((anchor, prev), (Anchor::Chained { .. }, Some((_, true))));

        emit_block(&mut sheet, index, entry, anchor, reconciled);
        prev = Some((entry, reconciled));
    }

    fill_reconciled(&mut sheet);
    sheet
}

/// A chained entry links to the previous block only if it really started
/// where that block ended.
fn continues_from(entry: &HistoryEntry, prev: &HistoryEntry) -> bool {
    entry.is_chained() && !entry.rows.is_empty() && !prev.rows.is_empty() && entry.start == prev.end
}

fn title(index: usize, entry: &HistoryEntry) -> String {
    let mut s = format!(
        "Run {}: {} - {} ({}, {} worker{})",
        index + 1,
        format_instant(&entry.start),
        format_instant(&entry.end),
        entry.mode.as_str(),
        entry.workers,
        if entry.workers == 1 { "" } else { "s" }
    );
    if entry.is_chained() {
        s.push_str(", chained");
    }
    s
}

fn emit_block(sheet: &mut Worksheet, index: usize, entry: &HistoryEntry, anchor: Anchor, reconciled: bool) {
    let lunch = LunchSchedule::new(&entry.lunch);

    let mut row = SheetRow::new(RowKind::Title);
    row.push(Cell::text(col::NO, &title(index, entry), CellStyle::Title).merged(LAST_VISIBLE - 1));
    sheet.push(row);

    let mut row = SheetRow::new(RowKind::Header);
    for (i, h) in HEADERS.iter().enumerate() {
        row.push(Cell::text(i as u32 + 1, h, CellStyle::Header));
    }
    sheet.push(row);

    let first = sheet.next_row();
    let last = first + entry.rows.len().saturating_sub(1) as u32;
    let block = Block {
        entry,
        lunch: &lunch,
        first,
        last,
        anchor,
        reconciled,
    };

    for (i, r) in entry.rows.iter().enumerate() {
        let mut data = block.data_row(i, r);
        data.source = Some(RowSource {
            entry: index,
            row: i,
            reconciled,
        });
        sheet.push(data);
    }

    for line in &entry.report {
        let mut row = SheetRow::new(RowKind::Report);
        row.push(Cell::text(col::NO, line, CellStyle::Report).merged(LAST_VISIBLE - 1));
        sheet.push(row);
    }

    sheet.push(SheetRow::new(RowKind::Blank));
}

/// Context of the block being emitted.
struct Block<'a> {
    entry: &'a HistoryEntry,
    lunch: &'a LunchSchedule,
    /// First and last data row (1-based).
    first: u32,
    last: u32,
    anchor: Anchor,
    reconciled: bool,
}

impl Block<'_> {
    /// Cached value, unless the row is recomputed from the sheet afterwards.
    fn cached(&self, v: CellValue) -> Option<CellValue> {
        (!self.reconciled).then_some(v)
    }

    fn data_row(&self, i: usize, r: &ScheduleRow) -> SheetRow {
        let rows = &self.entry.rows;
        let individual = self.entry.mode.is_individual();
        let continuation = !individual && i > 0 && rows[i - 1].same_operation(r);
        let group_end = rows.get(i + 1).is_none_or(|next| !next.same_operation(r));
        let literal_start = i == 0 && self.anchor == Anchor::Literal;

        let mut row = SheetRow::new(RowKind::Data);
        row.push(Cell::label(col::NO, &r.operation.to_string(), CellStyle::Center));
        row.push(Cell::label(col::CONFIRMATION, &r.confirmation, CellStyle::Center));
        row.push(Cell::label(col::OPERATION, &r.name, CellStyle::Default));
        row.push(Cell::label(col::WORKER, &r.worker_label, CellStyle::Default));
        row.push(Cell::number(col::POSTING_DATE, date_to_serial(&r.posting_date), CellStyle::Date));

        // pause and duration
        if continuation {
            row.push(Cell::formula(
                col::PAUSE,
                Expr::cell(CellRef::above(1)),
                Some(CellValue::Number(r.pause_fraction)),
                CellStyle::Clock,
            ));
            row.push(Cell::formula(
                col::DURATION,
                Expr::cell(CellRef::above(1)),
                Some(CellValue::Number(r.duration)),
                CellStyle::Decimal,
            ));
        } else {
            row.push(Cell::number(col::PAUSE, r.pause_fraction, CellStyle::Clock));
            row.push(Cell::number(col::DURATION, r.duration, CellStyle::Decimal));
        }
        row.push(Cell::text(col::UNIT, r.unit.label(), CellStyle::Center));

        // start
        let start = datetime_to_serial(&r.start);
        if literal_start {
            row.push(Cell::number(col::START, start, CellStyle::DateTime));
        } else if continuation {
            row.push(Cell::formula(
                col::START,
                Expr::cell(CellRef::above(1)),
                self.cached(CellValue::Number(start)),
                CellStyle::DateTime,
            ));
        } else {
            row.push(Cell::formula(
                col::START,
                start_formula(Expr::cell(CellRef::col(col::BASE)), self.lunch),
                self.cached(CellValue::Number(start)),
                CellStyle::DateTime,
            ));
        }

        row.push(Cell::formula(
            col::END,
            end_formula(self.lunch),
            self.cached(CellValue::Number(datetime_to_serial(&r.end))),
            CellStyle::DateTime,
        ));

        let icon = if r.crossed_lunch { LUNCH_ICON } else { "" };
        row.push(Cell::formula(
            col::LUNCH,
            icon_formula(self.lunch),
            self.cached(CellValue::Text(icon.to_string())),
            CellStyle::Center,
        ));

        row.push(Cell::text(col::KEY, &r.lookup_key(), CellStyle::Default));

        // base
        let base = datetime_to_serial(&r.planned_start);
        if literal_start {
            row.push(Cell::number(col::BASE, base, CellStyle::DateTime));
        } else {
            row.push(Cell::formula(
                col::BASE,
                self.base_formula(i, r, continuation),
                self.cached(CellValue::Number(base)),
                CellStyle::DateTime,
            ));
        }

        let elapsed = minutes_to_day_fraction(r.unit.to_minutes(r.duration));
        row.push(Cell::formula(
            col::ELAPSED,
            elapsed_formula(),
            Some(CellValue::Number(elapsed)),
            CellStyle::Clock,
        ));

        if group_end {
            for c in &mut row.cells {
                c.border_bottom = true;
            }
        }

        row
    }

    fn base_formula(&self, i: usize, r: &ScheduleRow, continuation: bool) -> Expr {
        let pause = Expr::cell(CellRef::col(col::PAUSE));

        if i == 0
            && let Anchor::Chained { offset } = self.anchor
        {
            return Expr::cell(CellRef::offset(-(offset as i32), col::END)) + pause;
        }

        if !self.entry.mode.is_individual() {
            return if continuation {
                Expr::cell(CellRef::above(1))
            } else {
                Expr::cell(CellRef::offset(-1, col::END)) + pause
            };
        }

        // individual: the worker's own previous operation in this block
        let previous = self.entry.rows[..i]
            .iter()
            .rev()
            .find(|p| p.worker == r.worker && p.operation != r.operation);

        match previous {
            Some(p) => {
                let ends = Expr::range(
                    CellRef::fixed(self.first, col::END),
                    CellRef::fixed(self.last, col::END),
                );
                let keys = Expr::range(
                    CellRef::fixed(self.first, col::KEY),
                    CellRef::fixed(self.last, col::KEY),
                );
                let position = Expr::call(
                    Func::Match,
                    vec![Expr::text(&lookup_key(p.operation, r.worker)), keys, Expr::num(0.0)],
                );
                Expr::call(Func::Index, vec![ends, position]) + pause
            }
            // block seed: first row's base minus its pause
            None => {
                Expr::cell(CellRef::fixed(self.first, col::BASE))
                    - Expr::cell(CellRef::fixed(self.first, col::PAUSE))
                    + pause
            }
        }
    }
}

/// Compute the cached values of reconciled rows by evaluating the sheet.
fn fill_reconciled(sheet: &mut Worksheet) {
    let targets: Vec<(u32, u32)> = sheet
        .data_rows()
        .filter(|(_, r)| r.source.is_some_and(|s| s.reconciled))
        .flat_map(|(n, r)| {
            r.cells
                .iter()
                .filter(|c| c.formula.is_some())
                .map(move |c| (n, c.col))
        })
        .collect();

    if targets.is_empty() {
        return;
    }

    let values: Vec<((u32, u32), Option<CellValue>)> = {
        let mut eval = Evaluator::new(&*sheet);
        targets
            .into_iter()
            .map(|(r, c)| ((r, c), CellValue::from_value(&eval.cell(r, c))))
            .collect()
    };

    for ((r, c), v) in values {
        if let Some(cell) = sheet
            .rows
            .get_mut(r as usize - 1)
            .and_then(|row| row.cell_mut(c))
        {
            cell.value = v;
        }
    }
}
