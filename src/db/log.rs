use crate::errors::AppResult;
use crate::models::diagnostics::Diagnostics;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// A stored internal log line.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // ISO 8601, local time
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// One `warning` line per diagnostic.
pub fn log_diagnostics(conn: &Connection, operation: &str, diags: &Diagnostics) -> AppResult<()> {
    for d in diags.iter() {
        ttlog(conn, operation, &d.target, &d.message)?;
    }
    Ok(())
}

pub fn load_lines(conn: &Connection) -> AppResult<Vec<LogLine>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(LogLine {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
