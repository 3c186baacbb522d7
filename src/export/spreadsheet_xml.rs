// src/export/spreadsheet_xml.rs

//! SpreadsheetML 2003 writer: fixed styles and column preamble, then the
//! worksheet with R1C1 formulas and their cached values.

use crate::errors::{AppError, AppResult};
use crate::export::formula::format_number;
use crate::export::notify_export_success;
use crate::export::sheet::{COLUMN_COUNT, COLUMN_WIDTHS, Cell, CellStyle, CellValue, HIDDEN_COLUMNS, SheetRow, Worksheet};
use crate::ui::messages::info;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs;
use std::path::Path;

const NS_SPREADSHEET: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const NS_OFFICE: &str = "urn:schemas-microsoft-com:office:office";
const NS_EXCEL: &str = "urn:schemas-microsoft-com:office:excel";
const NS_HTML: &str = "http://www.w3.org/TR/REC-html40";

/// Points per character of column width.
const POINTS_PER_CHAR: f64 = 5.25;

type XmlWriter = Writer<Vec<u8>>;

fn xml_err(e: quick_xml::Error) -> AppError {
    AppError::Export(format!("XML write error: {e}"))
}

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> AppResult<()> {
    let el = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Start(el)).map_err(xml_err)
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> AppResult<()> {
    let el = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(el)).map_err(xml_err)
}

fn end(w: &mut XmlWriter, name: &str) -> AppResult<()> {
    w.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)
}

fn text(w: &mut XmlWriter, s: &str) -> AppResult<()> {
    w.write_event(Event::Text(BytesText::new(s))).map_err(xml_err)
}

/// Style id of a cell, with `B` appended for the bordered variant.
pub fn style_id(style: CellStyle, border_bottom: bool) -> String {
    if border_bottom {
        format!("{}B", style.id())
    } else {
        style.id().to_string()
    }
}

/// Render the whole workbook document.
pub fn render(sheet: &Worksheet) -> AppResult<Vec<u8>> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 1);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    w.write_event(Event::PI(BytesText::from_escaped(
        "mso-application progid=\"Excel.Sheet\"",
    )))
    .map_err(xml_err)?;

    start(
        &mut w,
        "Workbook",
        &[
            ("xmlns", NS_SPREADSHEET),
            ("xmlns:o", NS_OFFICE),
            ("xmlns:x", NS_EXCEL),
            ("xmlns:ss", NS_SPREADSHEET),
            ("xmlns:html", NS_HTML),
        ],
    )?;

    write_styles(&mut w)?;
    write_worksheet(&mut w, sheet)?;

    end(&mut w, "Workbook")?;
    Ok(w.into_inner())
}

// ---------------------------
// Styles
// ---------------------------

fn write_styles(w: &mut XmlWriter) -> AppResult<()> {
    start(w, "Styles", &[])?;

    start(w, "Style", &[("ss:ID", "Default"), ("ss:Name", "Normal")])?;
    empty(w, "Alignment", &[("ss:Vertical", "Center")])?;
    empty(w, "Font", &[("ss:FontName", "Calibri"), ("ss:Size", "11")])?;
    end(w, "Style")?;

    for style in CellStyle::ALL {
        for border in [false, true] {
            write_style(w, style, border)?;
        }
    }

    end(w, "Styles")
}

fn write_style(w: &mut XmlWriter, style: CellStyle, border_bottom: bool) -> AppResult<()> {
    let id = style_id(style, border_bottom);
    start(w, "Style", &[("ss:ID", &id)])?;

    match style {
        CellStyle::Title => {
            empty(w, "Font", &[("ss:Bold", "1"), ("ss:Size", "12")])?;
        }
        CellStyle::Header => {
            empty(w, "Alignment", &[("ss:Horizontal", "Center"), ("ss:WrapText", "1")])?;
            empty(w, "Font", &[("ss:Bold", "1"), ("ss:Color", "#FFFFFF")])?;
            empty(w, "Interior", &[("ss:Color", "#2F75B5"), ("ss:Pattern", "Solid")])?;
        }
        CellStyle::Center => {
            empty(w, "Alignment", &[("ss:Horizontal", "Center")])?;
        }
        CellStyle::Report => {
            empty(w, "Alignment", &[("ss:Horizontal", "Left"), ("ss:WrapText", "1")])?;
            empty(w, "Font", &[("ss:Italic", "1")])?;
        }
        _ => {}
    }

    if border_bottom {
        start(w, "Borders", &[])?;
        empty(
            w,
            "Border",
            &[
                ("ss:Position", "Bottom"),
                ("ss:LineStyle", "Continuous"),
                ("ss:Weight", "3"),
            ],
        )?;
        end(w, "Borders")?;
    }

    if let Some(fmt) = style.num_format() {
        empty(w, "NumberFormat", &[("ss:Format", fmt)])?;
    }

    end(w, "Style")
}

// ---------------------------
// Worksheet
// ---------------------------

fn write_worksheet(w: &mut XmlWriter, sheet: &Worksheet) -> AppResult<()> {
    start(w, "Worksheet", &[("ss:Name", &sheet.name)])?;

    let columns = COLUMN_COUNT.to_string();
    let rows = sheet.rows.len().max(1).to_string();
    start(
        w,
        "Table",
        &[
            ("ss:ExpandedColumnCount", &columns),
            ("ss:ExpandedRowCount", &rows),
            ("x:FullColumns", "1"),
            ("x:FullRows", "1"),
        ],
    )?;

    for (i, width) in COLUMN_WIDTHS.iter().enumerate() {
        let index = (i + 1).to_string();
        let points = format_number((width * POINTS_PER_CHAR).round());
        let mut attrs = vec![("ss:Index", index.as_str()), ("ss:Width", points.as_str())];
        if HIDDEN_COLUMNS.contains(&(i as u32 + 1)) {
            attrs.push(("ss:Hidden", "1"));
        }
        empty(w, "Column", &attrs)?;
    }

    for row in &sheet.rows {
        write_row(w, row)?;
    }

    end(w, "Table")?;

    start(w, "WorksheetOptions", &[("xmlns", NS_EXCEL)])?;
    start(w, "ProtectObjects", &[])?;
    text(w, "False")?;
    end(w, "ProtectObjects")?;
    start(w, "ProtectScenarios", &[])?;
    text(w, "False")?;
    end(w, "ProtectScenarios")?;
    end(w, "WorksheetOptions")?;

    end(w, "Worksheet")
}

fn write_row(w: &mut XmlWriter, row: &SheetRow) -> AppResult<()> {
    if row.cells.is_empty() {
        return empty(w, "Row", &[]);
    }

    start(w, "Row", &[])?;
    for cell in &row.cells {
        write_cell(w, cell)?;
    }
    end(w, "Row")
}

fn write_cell(w: &mut XmlWriter, cell: &Cell) -> AppResult<()> {
    let index = cell.col.to_string();
    let style = style_id(cell.style, cell.border_bottom);
    let formula = cell.formula.as_ref().map(|f| f.to_r1c1());
    let merge = cell.merge_across.to_string();

    let mut attrs = vec![("ss:Index", index.as_str()), ("ss:StyleID", style.as_str())];
    if cell.merge_across > 0 {
        attrs.push(("ss:MergeAcross", merge.as_str()));
    }
    if let Some(f) = &formula {
        attrs.push(("ss:Formula", f.as_str()));
    }

    let Some(value) = &cell.value else {
        return empty(w, "Cell", &attrs);
    };

    start(w, "Cell", &attrs)?;
    match value {
        CellValue::Number(n) => {
            start(w, "Data", &[("ss:Type", "Number")])?;
            text(w, &format_number(*n))?;
        }
        CellValue::Text(s) => {
            start(w, "Data", &[("ss:Type", "String")])?;
            text(w, s)?;
        }
    }
    end(w, "Data")?;
    end(w, "Cell")
}

/// Export the worksheet as a SpreadsheetML 2003 file.
pub(crate) fn export_xml(sheet: &Worksheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting to SpreadsheetML: {}", path.display()));

    let bytes = render(sheet)?;
    fs::write(path, bytes)?;

    notify_export_success("XML", path);
    Ok(())
}
