use crate::db::log::{LogLine, load_lines};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::visible_width;
use ansi_term::Colour;

/// Widest visible operation + target column.
const OP_WIDTH: usize = 60;

/// ANSI color of an operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "schedule" => Colour::Green,
        "history_clear" | "template_del" => Colour::Red,
        "template_save" | "template_load" | "config_migrate" => Colour::Yellow,
        "export" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "history" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

fn truncate_visible(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let lines = load_lines(&pool.conn)?;
        if lines.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let id_w = lines.iter().map(|l| l.id.to_string().len()).max().unwrap_or(1);

        let dates: Vec<String> = lines
            .iter()
            .map(|l| {
                chrono::DateTime::parse_from_rfc3339(&l.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| l.date.clone())
            })
            .collect();
        let date_w = dates.iter().map(String::len).max().unwrap_or(10);
        let op_w = op_width(&lines).min(OP_WIDTH);

        println!("📜 Internal log:\n");

        for (line, date) in lines.iter().zip(dates) {
            let color = color_for_operation(&line.operation);

            // only the operation word is colored, the target follows in plain text
            let op_target = if line.target.is_empty() {
                line.operation.clone()
            } else {
                format!("{} ({})", line.operation, line.target)
            };
            let visible = truncate_visible(&op_target, OP_WIDTH);
            let colored = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(visible_width(&colored)));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                line.id,
                date,
                colored,
                padding,
                line.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

fn op_width(lines: &[LogLine]) -> usize {
    lines
        .iter()
        .map(|l| {
            if l.target.is_empty() {
                l.operation.chars().count()
            } else {
                l.operation.chars().count() + l.target.chars().count() + 3
            }
        })
        .max()
        .unwrap_or(10)
}
