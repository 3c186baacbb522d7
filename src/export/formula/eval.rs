//! In-process evaluator for the formula subset the emitter produces.
//!
//! Follows spreadsheet semantics where they matter here: `MOD` takes the
//! sign of the divisor, `TIME` wraps at 24h, `MATCH` with type 0 is an exact,
//! case-insensitive lookup and errors propagate through every operator.

use super::{BinOp, Expr, Func};
use crate::core::calculator::Cmp;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Error(&'static str),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    fn to_number(&self) -> Result<f64, Value> {
        match self {
            Value::Empty => Ok(0.0),
            Value::Number(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().map_err(|_| Value::Error("#VALUE!")),
            Value::Error(_) => Err(self.clone()),
        }
    }

    fn to_bool(&self) -> Result<bool, Value> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Empty => Ok(false),
            Value::Number(n) => Ok(*n != 0.0),
            Value::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            Value::Text(_) => Err(Value::Error("#VALUE!")),
            Value::Error(_) => Err(self.clone()),
        }
    }
}

/// What a cell holds, as far as evaluation is concerned.
pub enum CellContent<'a> {
    Empty,
    Literal(Value),
    Formula(&'a Expr),
}

/// Grid the evaluator reads from. Coordinates are 1-based.
pub trait CellSource {
    fn content(&self, row: u32, col: u32) -> CellContent<'_>;
}

/// Memoizing evaluator over one sheet.
pub struct Evaluator<'a, S: CellSource> {
    sheet: &'a S,
    cache: HashMap<(u32, u32), Value>,
    visiting: HashSet<(u32, u32)>,
}

macro_rules! tri {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => return err,
        }
    };
}

impl<'a, S: CellSource> Evaluator<'a, S> {
    pub fn new(sheet: &'a S) -> Self {
        Self {
            sheet,
            cache: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    /// Value of a cell; circular references yield `#CIRC!`.
    pub fn cell(&mut self, row: u32, col: u32) -> Value {
        if let Some(v) = self.cache.get(&(row, col)) {
            return v.clone();
        }

        let sheet = self.sheet;
        let value = match sheet.content(row, col) {
            CellContent::Empty => Value::Empty,
            CellContent::Literal(v) => v,
            CellContent::Formula(expr) => {
                if !self.visiting.insert((row, col)) {
                    return Value::Error("#CIRC!");
                }
                let v = self.eval(expr, row, col);
                self.visiting.remove(&(row, col));
                v
            }
        };

        self.cache.insert((row, col), value.clone());
        value
    }

    /// Evaluate `expr` as if it lived in cell (`row`, `col`).
    pub fn eval(&mut self, expr: &Expr, row: u32, col: u32) -> Value {
        match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::Text(s) => Value::Text(s.clone()),
            Expr::Ref(r) => match r.resolve(row, col) {
                Some((r, c)) => self.cell(r, c),
                None => Value::Error("#REF!"),
            },
            // a bare range only makes sense as a function argument
            Expr::Range(..) => Value::Error("#VALUE!"),
            Expr::Binary(op, a, b) => {
                let a = tri!(self.eval(a, row, col).to_number());
                let b = tri!(self.eval(b, row, col).to_number());
                match op {
                    BinOp::Add => Value::Number(a + b),
                    BinOp::Sub => Value::Number(a - b),
                    BinOp::Mul => Value::Number(a * b),
                    BinOp::Div if b == 0.0 => Value::Error("#DIV/0!"),
                    BinOp::Div => Value::Number(a / b),
                }
            }
            Expr::Compare(op, a, b) => {
                let a = self.eval(a, row, col);
                if let Value::Error(_) = a {
                    return a;
                }
                let b = self.eval(b, row, col);
                if let Value::Error(_) = b {
                    return b;
                }
                Value::Bool(compare(*op, &a, &b))
            }
            Expr::Call(f, args) => self.call(*f, args, row, col),
        }
    }

    fn call(&mut self, f: Func, args: &[Expr], row: u32, col: u32) -> Value {
        match f {
            Func::If => {
                let Some(cond) = args.first() else {
                    return Value::Error("#VALUE!");
                };
                let branch = tri!(self.eval(cond, row, col).to_bool());
                let chosen = if branch { args.get(1) } else { args.get(2) };
                match chosen {
                    Some(e) => self.eval(e, row, col),
                    None => Value::Bool(branch),
                }
            }
            Func::And | Func::Or => {
                let mut acc = matches!(f, Func::And);
                for a in args {
                    let b = tri!(self.eval(a, row, col).to_bool());
                    if matches!(f, Func::And) {
                        acc &= b;
                    } else {
                        acc |= b;
                    }
                }
                Value::Bool(acc)
            }
            Func::Mod => {
                let (n, d) = tri!(self.two_numbers(args, row, col));
                if d == 0.0 {
                    return Value::Error("#DIV/0!");
                }
                Value::Number(n - d * (n / d).floor())
            }
            Func::Round => {
                let (n, digits) = tri!(self.two_numbers(args, row, col));
                let scale = 10f64.powi(digits.trunc() as i32);
                // half away from zero, as spreadsheets round
                Value::Number((n * scale).round() / scale)
            }
            Func::Time => {
                let mut parts = [0.0; 3];
                for (i, slot) in parts.iter_mut().enumerate() {
                    if let Some(a) = args.get(i) {
                        *slot = tri!(self.eval(a, row, col).to_number()).trunc();
                    }
                }
                let secs = parts[0] * 3600.0 + parts[1] * 60.0 + parts[2];
                if secs < 0.0 {
                    return Value::Error("#NUM!");
                }
                Value::Number((secs % 86_400.0) / 86_400.0)
            }
            Func::Index => self.index(args, row, col),
            Func::Match => self.match_exact(args, row, col),
        }
    }

    fn two_numbers(&mut self, args: &[Expr], row: u32, col: u32) -> Result<(f64, f64), Value> {
        let (Some(a), Some(b)) = (args.first(), args.get(1)) else {
            return Err(Value::Error("#VALUE!"));
        };
        let a = self.eval(a, row, col).to_number()?;
        let b = self.eval(b, row, col).to_number()?;
        Ok((a, b))
    }

    /// Cells of a range argument, row-major. `None` when the argument is no range.
    fn range_cells(&self, arg: Option<&Expr>, row: u32, col: u32) -> Option<Vec<(u32, u32)>> {
        let Some(Expr::Range(a, b)) = arg else {
            return None;
        };
        let (r1, c1) = a.resolve(row, col)?;
        let (r2, c2) = b.resolve(row, col)?;
        let mut cells = Vec::new();
        for r in r1.min(r2)..=r1.max(r2) {
            for c in c1.min(c2)..=c1.max(c2) {
                cells.push((r, c));
            }
        }
        Some(cells)
    }

    fn index(&mut self, args: &[Expr], row: u32, col: u32) -> Value {
        let Some(cells) = self.range_cells(args.first(), row, col) else {
            return Value::Error("#VALUE!");
        };
        let Some(pos) = args.get(1) else {
            return Value::Error("#VALUE!");
        };
        let pos = tri!(self.eval(pos, row, col).to_number()).trunc();
        if pos < 1.0 || pos as usize > cells.len() {
            return Value::Error("#REF!");
        }
        let (r, c) = cells[pos as usize - 1];
        self.cell(r, c)
    }

    fn match_exact(&mut self, args: &[Expr], row: u32, col: u32) -> Value {
        let Some(needle) = args.first() else {
            return Value::Error("#VALUE!");
        };
        let needle = self.eval(needle, row, col);
        if let Value::Error(_) = needle {
            return needle;
        }

        let kind = match args.get(2) {
            Some(e) => tri!(self.eval(e, row, col).to_number()),
            None => 1.0,
        };
        if kind != 0.0 {
            // only exact lookups are emitted
            return Value::Error("#N/A");
        }

        let Some(cells) = self.range_cells(args.get(1), row, col) else {
            return Value::Error("#N/A");
        };
        for (i, (r, c)) in cells.into_iter().enumerate() {
            let v = self.cell(r, c);
            if compare(Cmp::Eq, &needle, &v) {
                return Value::Number((i + 1) as f64);
            }
        }
        Value::Error("#N/A")
    }
}

/// Ordering rank of mixed types: numbers < text < booleans.
fn rank(v: &Value) -> u8 {
    match v {
        Value::Empty | Value::Number(_) => 0,
        Value::Text(_) => 1,
        Value::Bool(_) => 2,
        Value::Error(_) => 3,
    }
}

/// Spreadsheet comparison. Numbers compare exactly, as in the applications
/// that open the export.
pub fn compare(op: Cmp, a: &Value, b: &Value) -> bool {
    use std::cmp::Ordering;

    let ord = match (a, b) {
        (Value::Text(x), Value::Empty) | (Value::Empty, Value::Text(x)) if x.is_empty() => Ordering::Equal,
        (Value::Text(x), Value::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Text(_), Value::Empty) => Ordering::Greater,
        (Value::Empty, Value::Text(_)) => Ordering::Less,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        _ => {
            let x = a.to_number().unwrap_or(0.0);
            let y = b.to_number().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    };

    match op {
        Cmp::Lt => ord == Ordering::Less,
        Cmp::Le => ord != Ordering::Greater,
        Cmp::Gt => ord == Ordering::Greater,
        Cmp::Ge => ord != Ordering::Less,
        Cmp::Eq => ord == Ordering::Equal,
        Cmp::Ne => ord != Ordering::Equal,
    }
}
