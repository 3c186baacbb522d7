//! Formatting utilities used for CLI and export outputs.

use crate::models::duration_unit::DurationUnit;

/// Decimal value with at most two fractional digits, trailing zeros trimmed.
///
/// `10.0` → `"10"`, `8.333` → `"8.33"`, `0.75` → `"0.75"`
pub fn format_decimal(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// "10 min", "1.5 h"
pub fn format_amount(v: f64, unit: DurationUnit) -> String {
    format!("{} {}", format_decimal(v), unit.label())
}
