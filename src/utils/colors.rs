/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const YELLOW: &str = "\x1b[33m";

/// Wraps the lunch marker in yellow, or shows a grey dash.
pub fn colorize_lunch(crossed: bool, icon: &str) -> String {
    if crossed {
        format!("{YELLOW}{icon}{RESET}")
    } else {
        format!("{GREY}-{RESET}")
    }
}

/// Returns the value in grey when it carries no information ("0 min", "").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "0 min" || v == "0 h" || v == "-" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
