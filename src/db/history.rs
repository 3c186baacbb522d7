use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::diagnostics::Diagnostics;
use crate::models::history_entry::HistoryEntry;
use rusqlite::{Connection, params};

/// Store a finished run and return its row id.
pub fn insert_entry(conn: &Connection, entry: &HistoryEntry) -> AppResult<i64> {
    let body = serde_json::to_string(entry)?;

    conn.execute(
        "INSERT INTO history (created_at, body) VALUES (?1, ?2)",
        params![entry.created_at, body],
    )?;

    Ok(conn.last_insert_rowid())
}

/// All stored runs, most recent first.
///
/// A body that no longer parses is skipped and reported in `diags`; the
/// remaining entries are still returned.
pub fn load_all(pool: &mut DbPool, diags: &mut Diagnostics) -> AppResult<Vec<HistoryEntry>> {
    let mut stmt = pool
        .conn
        .prepare("SELECT id, body FROM history ORDER BY id DESC")?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>("id")?, row.get::<_, String>("body")?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (id, body) = r?;
        match serde_json::from_str::<HistoryEntry>(&body) {
            Ok(mut entry) => {
                entry.id = Some(id);
                out.push(entry);
            }
            Err(e) => diags.push(format!("history #{id}"), format!("unreadable entry skipped: {e}")),
        }
    }
    Ok(out)
}

/// Stored runs oldest first, as the worksheet lays them out.
pub fn load_chronological(pool: &mut DbPool, diags: &mut Diagnostics) -> AppResult<Vec<HistoryEntry>> {
    let mut entries = load_all(pool, diags)?;
    entries.reverse();
    Ok(entries)
}

pub fn count(pool: &mut DbPool) -> AppResult<usize> {
    let n: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
    Ok(n as usize)
}

/// Remove every stored run. Returns how many were deleted.
pub fn clear(pool: &mut DbPool) -> AppResult<usize> {
    let n = pool.conn.execute("DELETE FROM history", [])?;
    Ok(n)
}
