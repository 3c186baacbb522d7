//! Small key/value persistence (chain seed and friends).

use crate::errors::AppResult;
use crate::utils::time::parse_instant;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

/// Key holding the end instant of the last chained run.
pub const NEXT_START: &str = "next_start";

pub fn get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let v = conn
        .query_row("SELECT value FROM state WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove(conn: &Connection, key: &str) -> AppResult<()> {
    conn.execute("DELETE FROM state WHERE key = ?1", [key])?;
    Ok(())
}

/// Chain seed, if one is stored and readable.
pub fn load_next_start(conn: &Connection) -> AppResult<Option<NaiveDateTime>> {
    Ok(get(conn, NEXT_START)?.and_then(|s| parse_instant(&s)))
}

pub fn save_next_start(conn: &Connection, at: &NaiveDateTime) -> AppResult<()> {
    set(conn, NEXT_START, &at.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
}
