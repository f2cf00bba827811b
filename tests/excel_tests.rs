//! Excel import/export tests
//!
//! Fixtures are written with rust_xlsxwriter and read back with calamine so the
//! tests check the real on-disk format, not just our own round trip.

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook};
use sheetpass::excel::{ExcelExporter, ExcelImporter, SHEET_NAME};
use sheetpass::{intake, Cell, Column, ColumnValue, Document, IntakeError};
use std::path::Path;
use tempfile::TempDir;

fn read_sheet(path: &Path) -> (Vec<String>, Vec<Vec<Data>>) {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let names = workbook.sheet_names();
    let range = workbook.worksheet_range(&names[0]).unwrap();
    let mut rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    let header = rows.remove(0).iter().map(|c| c.to_string()).collect();
    (header, rows)
}

// ═══════════════════════════════════════════════════════════════════════════
// EXCEL IMPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_first_sheet_only() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("two_sheets.xlsx");

    let mut workbook = Workbook::new();
    let first = workbook.add_worksheet();
    first.set_name("Stations").unwrap();
    first.write_string(0, 0, "station").unwrap();
    first.write_string(0, 1, "flow").unwrap();
    first.write_string(1, 0, "A-1").unwrap();
    first.write_number(1, 1, 12.5).unwrap();
    first.write_string(2, 0, "B-7").unwrap();
    first.write_number(2, 1, 3.0).unwrap();
    let second = workbook.add_worksheet();
    second.set_name("Ignored").unwrap();
    second.write_string(0, 0, "other").unwrap();
    workbook.save(&path).unwrap();

    let doc = ExcelImporter::new(&path).import().unwrap();

    assert_eq!(doc.column_names(), vec!["station", "flow"]);
    assert_eq!(doc.row_count(), 2);
    assert_eq!(
        doc.column("flow").unwrap().values,
        ColumnValue::Number(vec![Some(12.5), Some(3.0)])
    );
    assert_eq!(doc.cell(1, 0), Cell::Text("B-7".to_string()));
}

#[test]
fn test_import_keeps_blank_first_column() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("offset.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 1, "gauge").unwrap();
    sheet.write_string(0, 2, "level").unwrap();
    sheet.write_string(1, 1, "G-3").unwrap();
    sheet.write_number(1, 2, 0.75).unwrap();
    workbook.save(&path).unwrap();

    let doc = ExcelImporter::new(&path).import().unwrap();

    assert_eq!(doc.column_names(), vec!["Unnamed: 0", "gauge", "level"]);
    assert_eq!(doc.cell(0, 0), Cell::Empty);
    assert_eq!(doc.cell(0, 2), Cell::Number(0.75));
}

#[test]
fn test_import_dates_and_booleans() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("typed.xlsx");

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "day").unwrap();
    sheet.write_string(0, 1, "wet").unwrap();
    // 2024-01-05 as an Excel serial
    sheet.write_number_with_format(1, 0, 45296.0, &date_format).unwrap();
    sheet.write_boolean(1, 1, true).unwrap();
    workbook.save(&path).unwrap();

    let doc = ExcelImporter::new(&path).import().unwrap();

    let expected = NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(doc.cell(0, 0), Cell::DateTime(expected));
    assert_eq!(doc.cell(0, 1), Cell::Boolean(true));
}

#[test]
fn test_import_empty_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.xlsx");

    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).unwrap();

    let doc = ExcelImporter::new(&path).import().unwrap();
    assert_eq!(doc.row_count(), 0);
    assert!(doc.columns().is_empty());
}

#[test]
fn test_import_corrupt_file_is_parse_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.xlsx");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let result = intake::load(&path);
    assert!(matches!(result, Err(IntakeError::ParseFailure(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXCEL EXPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_default_sheet_without_index() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.xlsx");

    let doc = Document::from_columns(vec![
        Column::new("site", ColumnValue::Text(vec![Some("north".into()), None])),
        Column::new("area", ColumnValue::Number(vec![Some(1.5), Some(2.0)])),
        Column::new("active", ColumnValue::Boolean(vec![Some(false), Some(true)])),
    ]);
    ExcelExporter::new(&doc).export(&path).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
    drop(workbook);

    let (header, rows) = read_sheet(&path);
    assert_eq!(header, vec!["site", "area", "active"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], Data::String("north".into()));
    assert_eq!(rows[0][1], Data::Float(1.5));
    assert_eq!(rows[0][2], Data::Bool(false));
    assert_eq!(rows[1][0], Data::Empty);
    assert_eq!(rows[1][2], Data::Bool(true));
}

#[test]
fn test_export_then_import_preserves_datetimes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dates.xlsx");

    let at = NaiveDate::from_ymd_opt(2023, 7, 14)
        .unwrap()
        .and_hms_opt(6, 45, 0)
        .unwrap();
    let doc = Document::from_columns(vec![Column::new(
        "measured",
        ColumnValue::DateTime(vec![Some(at), None]),
    )]);
    ExcelExporter::new(&doc).export(&path).unwrap();

    let back = ExcelImporter::new(&path).import().unwrap();
    assert_eq!(back.cell(0, 0), Cell::DateTime(at));
}
