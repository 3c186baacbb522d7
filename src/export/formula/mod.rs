//! Spreadsheet formula expressions.
//!
//! A formula is built once as an [`Expr`] tree and then rendered either in
//! R1C1 notation (SpreadsheetML) or in A1 notation relative to the cell that
//! hosts it (XLSX). The same tree is evaluated in-process by [`eval`].

pub mod eval;
pub mod rules;

use crate::core::calculator::Cmp;
use crate::utils::time::MINUTES_PER_DAY;
use std::ops::{Add, Div, Mul, Sub};

/// Decimals kept by [`Expr::minutes`].
pub const MINUTE_DIGITS: f64 = 6.0;

/// One coordinate of a reference: offset from the host cell, or fixed (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Relative(i32),
    Absolute(u32),
}

impl Axis {
    /// 1-based coordinate as seen from `host`.
    pub fn resolve(self, host: u32) -> Option<u32> {
        match self {
            Axis::Relative(d) => {
                let v = host as i64 + d as i64;
                (v >= 1).then_some(v as u32)
            }
            Axis::Absolute(v) => (v >= 1).then_some(v),
        }
    }

    fn r1c1(self, prefix: char) -> String {
        match self {
            Axis::Relative(0) => prefix.to_string(),
            Axis::Relative(d) => format!("{prefix}[{d}]"),
            Axis::Absolute(v) => format!("{prefix}{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: Axis,
    pub col: Axis,
}

impl CellRef {
    /// Same row, fixed column: `RC6`
    pub fn col(col: u32) -> Self {
        Self {
            row: Axis::Relative(0),
            col: Axis::Absolute(col),
        }
    }

    /// Row offset, fixed column: `R[-1]C10`
    pub fn offset(rows: i32, col: u32) -> Self {
        Self {
            row: Axis::Relative(rows),
            col: Axis::Absolute(col),
        }
    }

    /// Row offset, same column: `R[-1]C`
    pub fn above(rows: i32) -> Self {
        Self {
            row: Axis::Relative(-rows),
            col: Axis::Relative(0),
        }
    }

    /// Fixed row and column: `R5C13`
    pub fn fixed(row: u32, col: u32) -> Self {
        Self {
            row: Axis::Absolute(row),
            col: Axis::Absolute(col),
        }
    }

    /// (row, col) seen from the host cell.
    pub fn resolve(&self, host_row: u32, host_col: u32) -> Option<(u32, u32)> {
        Some((self.row.resolve(host_row)?, self.col.resolve(host_col)?))
    }

    pub fn r1c1(&self) -> String {
        format!("{}{}", self.row.r1c1('R'), self.col.r1c1('C'))
    }

    /// A1 text with `$` on fixed coordinates. `None` when the reference
    /// falls outside the sheet.
    pub fn a1(&self, host_row: u32, host_col: u32) -> Option<String> {
        let (row, col) = self.resolve(host_row, host_col)?;
        let col_mark = if matches!(self.col, Axis::Absolute(_)) { "$" } else { "" };
        let row_mark = if matches!(self.row, Axis::Absolute(_)) { "$" } else { "" };
        Some(format!("{col_mark}{}{row_mark}{row}", col_to_letter(col)))
    }
}

/// 1-based column number to letters: 1 → A, 27 → AA.
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        result.insert(0, (b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 2,
            BinOp::Mul | BinOp::Div => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    If,
    And,
    Or,
    Mod,
    Round,
    Time,
    Index,
    Match,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::If => "IF",
            Func::And => "AND",
            Func::Or => "OR",
            Func::Mod => "MOD",
            Func::Round => "ROUND",
            Func::Time => "TIME",
            Func::Index => "INDEX",
            Func::Match => "MATCH",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    Ref(CellRef),
    Range(CellRef, CellRef),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Compare(Cmp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

/// Where a formula is rendered: the notation and, for A1, the host cell.
#[derive(Debug, Clone, Copy)]
enum Notation {
    R1C1,
    A1 { row: u32, col: u32 },
}

impl Expr {
    pub fn num(v: f64) -> Self {
        Expr::Number(v)
    }

    pub fn text(s: &str) -> Self {
        Expr::Text(s.to_string())
    }

    pub fn cell(r: CellRef) -> Self {
        Expr::Ref(r)
    }

    pub fn range(from: CellRef, to: CellRef) -> Self {
        Expr::Range(from, to)
    }

    pub fn call(f: Func, args: Vec<Expr>) -> Self {
        Expr::Call(f, args)
    }

    pub fn compare(op: Cmp, a: Expr, b: Expr) -> Self {
        Expr::Compare(op, Box::new(a), Box::new(b))
    }

    pub fn if_(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::call(Func::If, vec![cond, then, otherwise])
    }

    pub fn and(args: Vec<Expr>) -> Self {
        Expr::call(Func::And, args)
    }

    pub fn or(args: Vec<Expr>) -> Self {
        Expr::call(Func::Or, args)
    }

    /// `MOD(x,1)`: time of day of a date-time serial.
    pub fn time_of_day(x: Expr) -> Self {
        Expr::call(Func::Mod, vec![x, Expr::num(1.0)])
    }

    /// `ROUND(x*1440,6)`: a day fraction in minutes, free of serial noise.
    ///
    /// Date-time serials lose about 1e-12 of a day through `MOD`; compared
    /// raw, an interval ending on a window start would read as crossing it.
    pub fn minutes(x: Expr) -> Self {
        Expr::call(
            Func::Round,
            vec![x * Expr::num(MINUTES_PER_DAY), Expr::num(MINUTE_DIGITS)],
        )
    }

    pub fn time(hour: u32, minute: u32) -> Self {
        Expr::call(
            Func::Time,
            vec![Expr::num(hour as f64), Expr::num(minute as f64), Expr::num(0.0)],
        )
    }

    /// R1C1 text with the leading `=`.
    pub fn to_r1c1(&self) -> String {
        let mut out = String::from("=");
        self.write(&mut out, Notation::R1C1);
        out
    }

    /// A1 text with the leading `=`, as seen from the (1-based) host cell.
    pub fn to_a1(&self, row: u32, col: u32) -> String {
        let mut out = String::from("=");
        self.write(&mut out, Notation::A1 { row, col });
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Compare(..) => 1,
            Expr::Binary(op, ..) => op.precedence(),
            _ => 4,
        }
    }

    fn write(&self, out: &mut String, n: Notation) {
        match self {
            Expr::Number(v) => out.push_str(&format_number(*v)),
            Expr::Text(s) => {
                out.push('"');
                out.push_str(&s.replace('"', "\"\""));
                out.push('"');
            }
            Expr::Ref(r) => out.push_str(&render_ref(r, n)),
            Expr::Range(a, b) => {
                out.push_str(&render_ref(a, n));
                out.push(':');
                out.push_str(&render_ref(b, n));
            }
            Expr::Binary(op, a, b) => {
                let p = op.precedence();
                write_operand(out, a, p, false, n);
                out.push(op.symbol());
                // a-(b+c) and a/(b*c) keep their parentheses
                let strict = matches!(op, BinOp::Sub | BinOp::Div);
                write_operand(out, b, p, strict, n);
            }
            Expr::Compare(op, a, b) => {
                write_operand(out, a, 1, true, n);
                out.push_str(op.symbol());
                write_operand(out, b, 1, true, n);
            }
            Expr::Call(f, args) => {
                out.push_str(f.name());
                out.push('(');
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    a.write(out, n);
                }
                out.push(')');
            }
        }
    }
}

fn write_operand(out: &mut String, e: &Expr, parent: u8, strict: bool, n: Notation) {
    let p = e.precedence();
    let wrap = p < parent || (strict && p == parent);
    if wrap {
        out.push('(');
    }
    e.write(out, n);
    if wrap {
        out.push(')');
    }
}

fn render_ref(r: &CellRef, n: Notation) -> String {
    match n {
        Notation::R1C1 => r.r1c1(),
        Notation::A1 { row, col } => r.a1(row, col).unwrap_or_else(|| "#REF!".to_string()),
    }
}

/// Shortest text that reads back as the same number.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Binary(BinOp::Add, Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Binary(BinOp::Sub, Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Binary(BinOp::Mul, Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Binary(BinOp::Div, Box::new(self), Box::new(rhs))
    }
}
