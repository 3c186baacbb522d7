use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::diagnostics::Diagnostics;
use crate::models::operation::{OperationDefinition, parse_plan};
use chrono::Local;
use rusqlite::{OptionalExtension, params};

/// Name and operation count of a stored template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub operations: usize,
    pub updated_at: String,
}

/// Insert or replace a template.
pub fn save(pool: &mut DbPool, name: &str, ops: &[OperationDefinition]) -> AppResult<()> {
    let body = serde_json::to_string(ops)?;
    let now = Local::now().to_rfc3339();

    pool.conn.execute(
        "INSERT INTO templates (name, body, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        params![name, body, now],
    )?;
    Ok(())
}

/// Load a template through the same lenient path as plan files.
pub fn load(pool: &mut DbPool, name: &str, diags: &mut Diagnostics) -> AppResult<Vec<OperationDefinition>> {
    let body: Option<String> = pool
        .conn
        .query_row("SELECT body FROM templates WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;

    let body = body.ok_or_else(|| AppError::TemplateNotFound(name.to_string()))?;
    parse_plan(&body, diags)
}

pub fn list(pool: &mut DbPool) -> AppResult<Vec<TemplateSummary>> {
    let mut stmt = pool
        .conn
        .prepare("SELECT name, body, updated_at FROM templates ORDER BY name ASC")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>("name")?,
            row.get::<_, String>("body")?,
            row.get::<_, String>("updated_at")?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (name, body, updated_at) = r?;
        let operations = serde_json::from_str::<Vec<serde_json::Value>>(&body)
            .map(|v| v.len())
            .unwrap_or(0);
        out.push(TemplateSummary {
            name,
            operations,
            updated_at,
        });
    }
    Ok(out)
}

/// Returns false when no template had that name.
pub fn delete(pool: &mut DbPool, name: &str) -> AppResult<bool> {
    let n = pool
        .conn
        .execute("DELETE FROM templates WHERE name = ?1", [name])?;
    Ok(n > 0)
}
