// src/export/logic.rs

use crate::config::Config;
use crate::core::template::report_diagnostics;
use crate::db::history::load_chronological;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::emitter::build_worksheet;
use crate::export::fs_utils::{ensure_inside, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::flatten;
use crate::export::spreadsheet_xml::export_xml;
use crate::export::verify::{Mismatch, verify};
use crate::export::xlsx::export_xlsx;
use crate::models::diagnostics::Diagnostics;
use crate::ui::messages::{detail, success, warning};
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

/// High-level business logic for the `export` command.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the whole history, oldest run first.
    ///
    /// With `export_dir` configured a relative file name is placed inside it
    /// and any target resolving outside it is refused.
    /// With `verify` the worksheet formulas are evaluated and compared with
    /// the stored rows; divergences are reported but do not fail the export.
    pub fn export(
        pool: &mut DbPool,
        cfg: &Config,
        format: ExportFormat,
        file: &str,
        force: bool,
        verify_formulas: bool,
    ) -> AppResult<()> {
        let mut diags = Diagnostics::new();
        let entries = load_chronological(pool, &mut diags)?;
        report_diagnostics(pool, "export", &diags)?;

        if entries.is_empty() {
            warning("History is empty: nothing to export.");
            return Ok(());
        }

        let path = resolve_output(file, cfg.export_dir.as_deref());
        if let Some(dir) = cfg.export_dir.as_deref() {
            ensure_inside(&path, &expand_tilde(dir))?;
        }
        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Xml | ExportFormat::Xlsx => {
                let sheet = build_worksheet(&entries);
                if verify_formulas {
                    report_mismatches(&verify(&sheet, &entries));
                }
                match format {
                    ExportFormat::Xml => export_xml(&sheet, &path)?,
                    _ => export_xlsx(&sheet, &path)?,
                }
            }
            ExportFormat::Csv => export_csv(&flatten(&entries), &path)?,
            ExportFormat::Json => export_json(&flatten(&entries), &path)?,
        }

        ttlog(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} runs as {}", entries.len(), format.as_str()),
        )?;
        Ok(())
    }
}

fn resolve_output(file: &str, export_dir: Option<&str>) -> PathBuf {
    let path = expand_tilde(file);
    match export_dir {
        Some(dir) if path.is_relative() => expand_tilde(dir).join(path),
        _ => path,
    }
}

fn report_mismatches(found: &[Mismatch]) {
    if found.is_empty() {
        success("Formulas reproduce the stored schedule.");
        return;
    }

    warning(format!("{} formula result(s) differ from the stored schedule:", found.len()));
    for m in found {
        detail(format!(
            "sheet row {} (run {}, row {}) {}: expected {}, formula gives {}",
            m.sheet_row,
            m.entry + 1,
            m.row + 1,
            m.column,
            m.expected,
            m.actual
        ));
    }
}
