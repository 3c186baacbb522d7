//! Writer-independent worksheet model: rows of cells carrying literal values,
//! formulas with cached results, and a style.

use crate::export::formula::Expr;
use crate::export::formula::eval::{CellContent, CellSource, Value};
use crate::utils::sanitize::{escape_formula, is_numeric_label};

/// 1-based column numbers of a schedule worksheet.
pub mod col {
    pub const NO: u32 = 1;
    pub const CONFIRMATION: u32 = 2;
    pub const OPERATION: u32 = 3;
    pub const WORKER: u32 = 4;
    pub const POSTING_DATE: u32 = 5;
    pub const PAUSE: u32 = 6;
    pub const DURATION: u32 = 7;
    pub const UNIT: u32 = 8;
    pub const START: u32 = 9;
    pub const END: u32 = 10;
    pub const LUNCH: u32 = 11;
    pub const KEY: u32 = 12;
    pub const BASE: u32 = 13;
    pub const ELAPSED: u32 = 14;
}

pub const COLUMN_COUNT: usize = 14;

/// Helper columns the reader never edits.
pub const HIDDEN_COLUMNS: [u32; 3] = [col::KEY, col::BASE, col::ELAPSED];

/// Last visible column; report lines are merged up to it.
pub const LAST_VISIBLE: u32 = col::LUNCH;

pub const HEADERS: [&str; COLUMN_COUNT] = [
    "No.",
    "Conf.",
    "Operation",
    "Worker",
    "Posting date",
    "Pause",
    "Duration",
    "Unit",
    "Start",
    "End",
    "Lunch",
    "Key",
    "Base",
    "Elapsed",
];

/// Display widths (characters) of the 14 columns.
pub const COLUMN_WIDTHS: [f64; COLUMN_COUNT] = [
    6.0, 8.0, 32.0, 14.0, 12.0, 8.0, 9.0, 6.0, 17.0, 17.0, 6.0, 10.0, 17.0, 10.0,
];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Labels that look numeric become numbers; other text is neutralized
    /// so that it can never be read as a formula.
    pub fn label(s: &str) -> Self {
        if is_numeric_label(s)
            && let Ok(n) = s.parse::<f64>()
        {
            return CellValue::Number(n);
        }
        CellValue::Text(escape_formula(s))
    }

    pub fn to_value(&self) -> Value {
        match self {
            CellValue::Number(n) => Value::Number(*n),
            CellValue::Text(s) => Value::Text(s.clone()),
        }
    }

    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Number(n) => Some(CellValue::Number(*n)),
            Value::Text(s) => Some(CellValue::Text(s.clone())),
            Value::Bool(b) => Some(CellValue::Text(if *b { "TRUE" } else { "FALSE" }.into())),
            Value::Error(e) => Some(CellValue::Text((*e).to_string())),
            Value::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    Default,
    Title,
    Header,
    Date,
    DateTime,
    /// Day fraction shown as h:mm
    Clock,
    Decimal,
    Center,
    Report,
}

impl CellStyle {
    pub const ALL: [CellStyle; 9] = [
        CellStyle::Default,
        CellStyle::Title,
        CellStyle::Header,
        CellStyle::Date,
        CellStyle::DateTime,
        CellStyle::Clock,
        CellStyle::Decimal,
        CellStyle::Center,
        CellStyle::Report,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CellStyle::Default => "txt",
            CellStyle::Title => "title",
            CellStyle::Header => "header",
            CellStyle::Date => "date",
            CellStyle::DateTime => "dt",
            CellStyle::Clock => "clock",
            CellStyle::Decimal => "dec",
            CellStyle::Center => "center",
            CellStyle::Report => "report",
        }
    }

    /// Excel number format, if any.
    pub fn num_format(self) -> Option<&'static str> {
        match self {
            CellStyle::Date => Some("yyyy-mm-dd"),
            CellStyle::DateTime => Some("yyyy-mm-dd hh:mm"),
            CellStyle::Clock => Some("[h]:mm"),
            CellStyle::Decimal => Some("0.##"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 1-based column
    pub col: u32,
    /// Literal value, or the cached result of `formula`.
    pub value: Option<CellValue>,
    pub formula: Option<Expr>,
    pub style: CellStyle,
    /// Thick bottom border (last row of an operation group).
    pub border_bottom: bool,
    /// Extra columns merged to the right.
    pub merge_across: u32,
}

impl Cell {
    pub fn literal(col: u32, value: CellValue, style: CellStyle) -> Self {
        Self {
            col,
            value: Some(value),
            formula: None,
            style,
            border_bottom: false,
            merge_across: 0,
        }
    }

    pub fn number(col: u32, v: f64, style: CellStyle) -> Self {
        Self::literal(col, CellValue::Number(v), style)
    }

    pub fn text(col: u32, s: &str, style: CellStyle) -> Self {
        Self::literal(col, CellValue::Text(escape_formula(s)), style)
    }

    pub fn label(col: u32, s: &str, style: CellStyle) -> Self {
        Self::literal(col, CellValue::label(s), style)
    }

    pub fn formula(col: u32, formula: Expr, cached: Option<CellValue>, style: CellStyle) -> Self {
        Self {
            col,
            value: cached,
            formula: Some(formula),
            style,
            border_bottom: false,
            merge_across: 0,
        }
    }

    pub fn merged(mut self, across: u32) -> Self {
        self.merge_across = across;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Header,
    Data,
    Report,
    Blank,
}

/// Which history entry / schedule row a data row came from (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSource {
    pub entry: usize,
    pub row: usize,
    /// Values come from evaluating the sheet, not from the stored schedule.
    pub reconciled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
    pub source: Option<RowSource>,
}

impl SheetRow {
    pub fn new(kind: RowKind) -> Self {
        Self {
            kind,
            cells: Vec::new(),
            source: None,
        }
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells.iter().find(|c| c.col == col)
    }

    pub fn cell_mut(&mut self, col: u32) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.col == col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

impl Worksheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Append a row and return its 1-based number.
    pub fn push(&mut self, row: SheetRow) -> u32 {
        self.rows.push(row);
        self.rows.len() as u32
    }

    /// 1-based number of the next row to be pushed.
    pub fn next_row(&self) -> u32 {
        self.rows.len() as u32 + 1
    }

    pub fn row(&self, row: u32) -> Option<&SheetRow> {
        row.checked_sub(1).and_then(|i| self.rows.get(i as usize))
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.row(row)?.cell(col)
    }

    /// Data rows with their 1-based row numbers.
    pub fn data_rows(&self) -> impl Iterator<Item = (u32, &SheetRow)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.kind == RowKind::Data)
            .map(|(i, r)| (i as u32 + 1, r))
    }
}

impl CellSource for Worksheet {
    fn content(&self, row: u32, col: u32) -> CellContent<'_> {
        match self.cell(row, col) {
            None => CellContent::Empty,
            Some(Cell {
                formula: Some(f), ..
            }) => CellContent::Formula(f),
            Some(Cell { value: Some(v), .. }) => CellContent::Literal(v.to_value()),
            Some(_) => CellContent::Empty,
        }
    }
}
