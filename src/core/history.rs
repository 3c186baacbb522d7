use crate::core::report::render_table;
use crate::db::history::{clear, load_all};
use crate::db::log::{log_diagnostics, ttlog};
use crate::db::pool::DbPool;
use crate::db::state;
use crate::errors::{AppError, AppResult};
use crate::models::diagnostics::Diagnostics;
use crate::models::history_entry::HistoryEntry;
use crate::ui::messages::{detail, header, info, success, warning};
use crate::utils::table::Table;
use crate::utils::time::format_instant;

pub struct HistoryLogic;

impl HistoryLogic {
    /// Load the history, reporting (and logging) unreadable entries.
    pub fn load(pool: &mut DbPool) -> AppResult<Vec<HistoryEntry>> {
        let mut diags = Diagnostics::new();
        let entries = load_all(pool, &mut diags)?;
        if !diags.is_empty() {
            log_diagnostics(&pool.conn, "history", &diags)?;
            for d in diags.iter() {
                warning(format!("{}: {}", d.target, d.message));
            }
        }
        Ok(entries)
    }

    /// Summary table, most recent first. Position 1 is the latest run.
    pub fn list(pool: &mut DbPool) -> AppResult<()> {
        let entries = Self::load(pool)?;
        if entries.is_empty() {
            info("History is empty.");
            return Ok(());
        }

        let mut table = Table::with_headers(&["#", "Start", "End", "Mode", "Workers", "Ops", "Rows", "Source"]);
        for (i, e) in entries.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                format_instant(&e.start),
                format_instant(&e.end),
                e.mode.as_str().to_string(),
                e.workers.to_string(),
                e.operation_count().to_string(),
                e.rows.len().to_string(),
                if e.is_chained() { "chained" } else { "manual" }.to_string(),
            ]);
        }

        header(format!("History ({} runs)", entries.len()));
        print!("{}", table.render());
        Ok(())
    }

    pub fn show(pool: &mut DbPool, position: usize) -> AppResult<()> {
        let entries = Self::load(pool)?;
        let entry = position
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .ok_or(AppError::HistoryNotFound(position))?;

        header(format!(
            "Run #{position}: {} → {}",
            format_instant(&entry.start),
            format_instant(&entry.end)
        ));
        detail(format!(
            "mode {}, {} worker(s), lunch {}",
            entry.mode.as_str(),
            entry.workers,
            lunch_summary(entry)
        ));
        print!("{}", render_table(&entry.rows));
        println!();
        for line in &entry.report {
            println!("{line}");
        }
        Ok(())
    }

    /// Drop every stored run and the chain seed.
    pub fn clear(pool: &mut DbPool) -> AppResult<()> {
        let n = clear(pool)?;
        state::remove(&pool.conn, state::NEXT_START)?;
        ttlog(&pool.conn, "history_clear", "history", &format!("{n} entries removed"))?;
        success(format!("History cleared ({n} entries removed)."));
        Ok(())
    }
}

fn lunch_summary(entry: &HistoryEntry) -> String {
    if entry.lunch.is_empty() {
        return "none".to_string();
    }
    entry
        .lunch
        .iter()
        .map(|w| w.label())
        .collect::<Vec<_>>()
        .join(", ")
}
