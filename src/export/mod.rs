// src/export/mod.rs

pub mod emitter;
pub mod excel_date;
pub mod formula;
mod fs_utils;
mod json_csv;
pub mod logic;
pub mod model;
pub mod sheet;
pub mod spreadsheet_xml;
pub mod verify;
mod xlsx;

pub use logic::ExportLogic;
pub use model::RowExport;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message of every exporter.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// SpreadsheetML 2003 with live R1C1 formulas
    Xml,
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "xml",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}
