// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::formula::format_number;
use crate::export::notify_export_success;
use crate::export::sheet::{COLUMN_WIDTHS, Cell, CellStyle, CellValue, HIDDEN_COLUMNS, RowKind, Worksheet};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Formula, Workbook, XlsxError};
use std::collections::HashMap;
use std::path::Path;

fn to_app_error(e: XlsxError) -> AppError {
    AppError::Export(format!("XLSX error: {e}"))
}

/// rust_xlsxwriter format of a cell style.
fn build_format(style: CellStyle, border_bottom: bool) -> Format {
    let mut fmt = Format::new();

    match style {
        CellStyle::Title => fmt = fmt.set_bold().set_font_size(12),
        CellStyle::Header => {
            fmt = fmt
                .set_bold()
                .set_font_color(Color::RGB(0xFFFFFF))
                .set_background_color(Color::RGB(0x2F75B5))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_text_wrap()
        }
        CellStyle::Center => fmt = fmt.set_align(FormatAlign::Center),
        CellStyle::Report => fmt = fmt.set_italic().set_text_wrap(),
        _ => {}
    }

    if let Some(num) = style.num_format() {
        fmt = fmt.set_num_format(num);
    }
    if border_bottom {
        fmt = fmt.set_border_bottom(FormatBorder::Thick);
    }
    fmt
}

/// Cached formula result as the text rust_xlsxwriter stores.
fn cached_result(v: &CellValue) -> String {
    match v {
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
    }
}

/// Export XLSX: same worksheet as the XML export, formulas in A1 notation.
pub(crate) fn export_xlsx(sheet: &Worksheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(&sheet.name).map_err(to_app_error)?;

    let mut formats: HashMap<(CellStyle, bool), Format> = HashMap::new();
    for style in CellStyle::ALL {
        for border in [false, true] {
            formats.insert((style, border), build_format(style, border));
        }
    }

    // ---------------------------
    // Columns
    // ---------------------------
    for (i, width) in COLUMN_WIDTHS.iter().enumerate() {
        ws.set_column_width(i as u16, *width).map_err(to_app_error)?;
    }
    for c in HIDDEN_COLUMNS {
        ws.set_column_hidden((c - 1) as u16).map_err(to_app_error)?;
    }

    // ---------------------------
    // Rows
    // ---------------------------
    for (i, row) in sheet.rows.iter().enumerate() {
        let r = i as u32;
        for cell in &row.cells {
            let Some(fmt) = formats.get(&(cell.style, cell.border_bottom)) else {
                continue;
            };
            write_cell(ws, r, cell, fmt)?;
        }
    }

    // title and header of the first block stay visible
    if sheet.rows.get(1).is_some_and(|r| r.kind == RowKind::Header) {
        ws.set_freeze_panes(2, 0).map_err(to_app_error)?;
    }

    workbook.save(path).map_err(to_app_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Write one cell at 0-based row `r`.
fn write_cell(ws: &mut rust_xlsxwriter::Worksheet, r: u32, cell: &Cell, fmt: &Format) -> AppResult<()> {
    let c = (cell.col - 1) as u16;

    if let Some(expr) = &cell.formula {
        let mut formula = Formula::new(expr.to_a1(r + 1, cell.col));
        if let Some(v) = &cell.value {
            formula = formula.set_result(cached_result(v));
        }
        ws.write_formula_with_format(r, c, formula, fmt)
            .map_err(to_app_error)?;
        return Ok(());
    }

    match &cell.value {
        Some(CellValue::Text(s)) if cell.merge_across > 0 => {
            ws.merge_range(r, c, r, c + cell.merge_across as u16, s, fmt)
                .map_err(to_app_error)?;
        }
        Some(CellValue::Text(s)) => {
            ws.write_string_with_format(r, c, s, fmt).map_err(to_app_error)?;
        }
        Some(CellValue::Number(n)) => {
            ws.write_number_with_format(r, c, *n, fmt).map_err(to_app_error)?;
        }
        None => {
            ws.write_blank(r, c, fmt).map_err(to_app_error)?;
        }
    }
    Ok(())
}
