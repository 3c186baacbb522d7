use crate::db::log::{log_diagnostics, ttlog};
use crate::db::pool::DbPool;
use crate::db::templates;
use crate::errors::{AppError, AppResult};
use crate::models::diagnostics::Diagnostics;
use crate::models::operation::{OperationDefinition, parse_plan};
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::format_amount;
use crate::utils::table::Table;
use std::fs;
use std::path::Path;

pub struct TemplateLogic;

/// Print and log the normalization findings of a plan or template.
pub fn report_diagnostics(pool: &DbPool, operation: &str, diags: &Diagnostics) -> AppResult<()> {
    for d in diags.iter() {
        warning(format!("{}: {}", d.target, d.message));
    }
    log_diagnostics(&pool.conn, operation, diags)
}

/// Read a plan file through the lenient parser.
pub fn read_plan_file(path: &Path, diags: &mut Diagnostics) -> AppResult<Vec<OperationDefinition>> {
    let content = fs::read_to_string(path)?;
    let ops = parse_plan(&content, diags)?;
    if ops.is_empty() {
        return Err(AppError::EmptyPlan);
    }
    Ok(ops)
}

impl TemplateLogic {
    pub fn save(pool: &mut DbPool, name: &str, file: &Path) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidPlan("template name is empty".into()));
        }

        let mut diags = Diagnostics::new();
        let ops = read_plan_file(file, &mut diags)?;
        report_diagnostics(pool, "template_save", &diags)?;

        templates::save(pool, name, &ops)?;
        ttlog(&pool.conn, "template_save", name, &format!("{} operations", ops.len()))?;
        success(format!("Template '{name}' saved ({} operations).", ops.len()));
        Ok(())
    }

    pub fn load(pool: &mut DbPool, name: &str) -> AppResult<Vec<OperationDefinition>> {
        let mut diags = Diagnostics::new();
        let ops = templates::load(pool, name, &mut diags)?;
        report_diagnostics(pool, "template_load", &diags)?;
        if ops.is_empty() {
            return Err(AppError::EmptyPlan);
        }
        Ok(ops)
    }

    pub fn list(pool: &mut DbPool) -> AppResult<()> {
        let all = templates::list(pool)?;
        if all.is_empty() {
            info("No templates stored.");
            return Ok(());
        }

        let mut table = Table::with_headers(&["Name", "Ops", "Updated"]);
        for t in all {
            table.add_row(vec![t.name, t.operations.to_string(), t.updated_at]);
        }
        print!("{}", table.render());
        Ok(())
    }

    pub fn show(pool: &mut DbPool, name: &str) -> AppResult<()> {
        let ops = Self::load(pool, name)?;

        let mut table = Table::with_headers(&["#", "Operation", "Duration", "Pause", "Workers", "Released", "Conf."]);
        for (i, op) in ops.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                op.name.clone(),
                format_amount(op.duration, op.unit),
                format_amount(op.pause, op.pause_unit),
                op.workers.as_ref().map(join_indices).unwrap_or_else(|| "all".into()),
                join_indices(&op.released),
                op.confirmation_label(i + 1),
            ]);
        }
        print!("{}", table.render());
        Ok(())
    }

    pub fn delete(pool: &mut DbPool, name: &str) -> AppResult<()> {
        if !templates::delete(pool, name)? {
            return Err(AppError::TemplateNotFound(name.to_string()));
        }
        ttlog(&pool.conn, "template_del", name, "Template deleted")?;
        success(format!("Template '{name}' deleted."));
        Ok(())
    }

    /// Write the template as a plan file.
    pub fn export(pool: &mut DbPool, name: &str, file: &Path) -> AppResult<()> {
        let ops = Self::load(pool, name)?;
        let json = serde_json::to_string_pretty(&serde_json::json!({ "operations": ops }))?;
        fs::write(file, json)?;
        success(format!("Template '{name}' written to {}", file.display()));
        Ok(())
    }
}

fn join_indices(set: &std::collections::BTreeSet<usize>) -> String {
    if set.is_empty() {
        return "-".to_string();
    }
    set.iter().map(usize::to_string).collect::<Vec<_>>().join(",")
}
