//! The lunch rules as worksheet formulas.
//!
//! Every comparison operator comes from [`Boundary`], so the sheet and the
//! scheduler cannot drift apart on where a window begins or ends.

use super::{CellRef, Expr};
use crate::core::calculator::Cmp;
use crate::core::calculator::lunch::{Boundary, LunchSchedule, PlacedWindow};
use crate::core::report::LUNCH_ICON;
use crate::export::sheet::col;
use crate::models::duration_unit::DurationUnit;
use crate::utils::time::MINUTES_PER_DAY;

fn window_end(w: &PlacedWindow) -> Expr {
    let end = w.window.end_minutes();
    Expr::time(end / 60, end % 60)
}

fn window_length(w: &PlacedWindow) -> Expr {
    Expr::time(w.window.duration / 60, w.window.duration % 60)
}

/// `ROUND(<day fraction>*1440,6) <op> <minutes>`: every lunch test goes
/// through here, so boundaries hold exactly at minute resolution.
fn at_minutes(op: Cmp, day_fraction: Expr, minutes: u32) -> Expr {
    Expr::compare(op, Expr::minutes(day_fraction), Expr::num(minutes as f64))
}

/// Rule A for one window: `IF(AND(tod>=WS,tod<WE),x-MOD(x,1)+WE,x)`.
pub fn shift(x: Expr, w: &PlacedWindow) -> Expr {
    let tod = Expr::time_of_day(x.clone());
    Expr::if_(
        Expr::and(vec![
            at_minutes(Boundary::INSIDE_FROM, tod.clone(), w.window.start_minutes()),
            at_minutes(Boundary::INSIDE_UNTIL, tod.clone(), w.window.end_minutes()),
        ]),
        x.clone() - tod + window_end(w),
        x,
    )
}

/// Rule B for one window on an interval of length `len` starting at `start`.
///
/// A rolling window adds a second clause for the next day's occurrence,
/// taken once today's window is over.
pub fn spans(start: Expr, len: Expr, w: &PlacedWindow) -> Expr {
    let ws = w.window.start_minutes();
    let tod = Expr::time_of_day(start);
    let today = Expr::and(vec![
        at_minutes(Boundary::SPAN_BEFORE, tod.clone(), ws),
        at_minutes(Boundary::SPAN_PAST, tod.clone() + len.clone(), ws),
    ]);

    if !w.rolls_over {
        return today;
    }

    let tomorrow = Expr::and(vec![
        at_minutes(Boundary::ROLL_AFTER, tod.clone(), w.window.end_minutes()),
        at_minutes(Boundary::SPAN_PAST, tod + len, ws + MINUTES_PER_DAY as u32),
    ]);
    Expr::or(vec![today, tomorrow])
}

/// Start column: every window's shift applied to `base`, in order.
pub fn start_formula(base: Expr, lunch: &LunchSchedule) -> Expr {
    lunch.windows().iter().fold(base, |x, w| shift(x, w))
}

/// Interval length after each window's Rule B, starting from the Elapsed column.
/// Item `i` is the length seen by window `i`; the last item is the final one.
fn lengths(lunch: &LunchSchedule) -> Vec<Expr> {
    let start = Expr::cell(CellRef::col(col::START));
    let mut len = Expr::cell(CellRef::col(col::ELAPSED));
    let mut out = vec![len.clone()];
    for w in lunch.windows() {
        len = len.clone()
            + Expr::if_(
                spans(start.clone(), len, w),
                window_length(w),
                Expr::num(0.0),
            );
        out.push(len.clone());
    }
    out
}

/// End column: `RC9+RC14+IF(<rule B>,<length>,0)...`
pub fn end_formula(lunch: &LunchSchedule) -> Expr {
    let start = Expr::cell(CellRef::col(col::START));
    let len = lengths(lunch).pop().unwrap_or_else(|| Expr::cell(CellRef::col(col::ELAPSED)));
    start + len
}

/// Lunch icon: shifted by Rule A (start after base) or extended by any Rule B.
pub fn icon_formula(lunch: &LunchSchedule) -> Expr {
    let start = Expr::cell(CellRef::col(col::START));
    let base = Expr::cell(CellRef::col(col::BASE));

    let mut conds = vec![at_minutes(Cmp::Gt, start.clone() - base, 0)];
    for (w, len) in lunch.windows().iter().zip(lengths(lunch)) {
        conds.push(spans(start.clone(), len, w));
    }

    Expr::if_(Expr::or(conds), Expr::text(LUNCH_ICON), Expr::text(""))
}

/// Elapsed column: `IF(RC8="h",RC7/24,RC7/1440)`
pub fn elapsed_formula() -> Expr {
    let duration = Expr::cell(CellRef::col(col::DURATION));
    Expr::if_(
        Expr::compare(
            Cmp::Eq,
            Expr::cell(CellRef::col(col::UNIT)),
            Expr::text(DurationUnit::Hour.label()),
        ),
        duration.clone() / Expr::num(24.0),
        duration / Expr::num(MINUTES_PER_DAY),
    )
}
