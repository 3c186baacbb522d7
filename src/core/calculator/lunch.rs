//! Lunch window model.
//!
//! Windows are daily intervals compared against the time of day of an
//! interval start. For every window, in chronological order:
//!
//! - **Rule A**: the start falls inside `[window start, window end)`; the
//!   start moves to the window end and the end keeps the interval length.
//! - **Rule B**: the interval starts strictly before the window and ends
//!   strictly after its start; the end grows by the window duration.
//!   An interval ending exactly at the window start does not cross it.
//!   Rule B is checked on the start left by Rule A, so only a rolled window
//!   can match both.
//!
//! The second window rolls to the next day once it is over for the day of
//! the current start, so a late operation can still run into it.
//!
//! The comparison operators live in [`Boundary`]; the spreadsheet formula
//! builder reads the same constants.

use crate::models::lunch_window::LunchWindow;
use crate::models::run_config::MAX_LUNCH_WINDOWS;
use crate::utils::time::{MILLIS_PER_DAY, millis_of_day};
use chrono::{Duration, NaiveDateTime};

/// Comparison operator, shared by the evaluator and the formula renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Cmp {
    pub fn holds<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Cmp::Lt => a < b,
            Cmp::Le => a <= b,
            Cmp::Gt => a > b,
            Cmp::Ge => a >= b,
            Cmp::Eq => a == b,
            Cmp::Ne => a != b,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Cmp::Lt => "<",
            Cmp::Le => "<=",
            Cmp::Gt => ">",
            Cmp::Ge => ">=",
            Cmp::Eq => "=",
            Cmp::Ne => "<>",
        }
    }
}

/// Boundary choices of the lunch rules.
pub struct Boundary;

impl Boundary {
    /// Rule A lower bound: `time of day >= window start`
    pub const INSIDE_FROM: Cmp = Cmp::Ge;
    /// Rule A upper bound: `time of day < window end`
    pub const INSIDE_UNTIL: Cmp = Cmp::Lt;
    /// Rule B: `time of day < window start`
    pub const SPAN_BEFORE: Cmp = Cmp::Lt;
    /// Rule B: `time of day + length > window start`
    pub const SPAN_PAST: Cmp = Cmp::Gt;
    /// Rolling window: `time of day >= window end` moves it to tomorrow
    pub const ROLL_AFTER: Cmp = Cmp::Ge;
}

/// A window placed in a run: the second one may roll into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedWindow {
    pub window: LunchWindow,
    pub rolls_over: bool,
}

impl PlacedWindow {
    pub fn start_ms(&self) -> i64 {
        self.window.start_minutes() as i64 * 60_000
    }

    pub fn end_ms(&self) -> i64 {
        self.window.end_minutes() as i64 * 60_000
    }

    pub fn duration_ms(&self) -> i64 {
        self.window.duration as i64 * 60_000
    }

    /// Rule A test on a time of day.
    pub fn contains(&self, tod: i64) -> bool {
        Boundary::INSIDE_FROM.holds(tod, self.start_ms())
            && Boundary::INSIDE_UNTIL.holds(tod, self.end_ms())
    }

    /// True when the window is taken from the next day for this start.
    pub fn rolled(&self, tod: i64) -> bool {
        self.rolls_over && Boundary::ROLL_AFTER.holds(tod, self.end_ms())
    }

    /// Rule B test on a time of day and an interval length.
    pub fn spanned_by(&self, tod: i64, len: i64) -> bool {
        let ws = if self.rolled(tod) {
            self.start_ms() + MILLIS_PER_DAY
        } else {
            self.start_ms()
        };
        Boundary::SPAN_BEFORE.holds(tod, ws) && Boundary::SPAN_PAST.holds(tod + len, ws)
    }

    /// Both rules for this window. Returns the new interval and whether it crossed.
    /// Rule B is tested on the start produced by Rule A.
    fn apply(&self, start: NaiveDateTime, end: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime, bool) {
        let len = end - start;
        let mut tod = millis_of_day(&start);
        let (mut start, mut end) = (start, end);
        let mut crossed = false;

        // Rule A
        if self.contains(tod) {
            start += Duration::milliseconds(self.end_ms() - tod);
            end = start + len;
            tod = self.end_ms();
            crossed = true;
        }

        // Rule B
        if self.spanned_by(tod, len.num_milliseconds()) {
            end += Duration::milliseconds(self.duration_ms());
            crossed = true;
        }

        (start, end, crossed)
    }
}

/// Result of passing an interval through the lunch windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchAdjustment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub crossed: bool,
}

/// The (at most two) lunch windows of one run, sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LunchSchedule {
    windows: Vec<PlacedWindow>,
}

impl LunchSchedule {
    /// Zero-length windows are dropped; extra windows beyond two are ignored.
    pub fn new(windows: &[LunchWindow]) -> Self {
        let mut list: Vec<LunchWindow> = windows
            .iter()
            .map(LunchWindow::normalized)
            .filter(|w| w.duration > 0)
            .take(MAX_LUNCH_WINDOWS)
            .collect();
        list.sort_by_key(LunchWindow::start_minutes);

        let windows = list
            .into_iter()
            .enumerate()
            .map(|(i, window)| PlacedWindow {
                window,
                rolls_over: i > 0,
            })
            .collect();

        Self { windows }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn windows(&self) -> &[PlacedWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Apply Rule A / Rule B of every window in order to `[start, end)`.
    /// The result never starts or ends earlier than the input.
    pub fn adjust(&self, start: NaiveDateTime, end: NaiveDateTime) -> LunchAdjustment {
        let mut adj = LunchAdjustment {
            start,
            end,
            crossed: false,
        };

        for w in &self.windows {
            let (s, e, crossed) = w.apply(adj.start, adj.end);
            adj.start = s;
            adj.end = e;
            adj.crossed |= crossed;
        }

        adj
    }
}
