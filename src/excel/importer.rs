//! Excel importer implementation - Excel (.xlsx) → Document

use crate::error::IntakeError;
use crate::types::{dedupe_headers, from_excel_serial, Cell, Column, Document};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Excel importer: reads the first worksheet, header row first
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the first worksheet of the workbook
    pub fn import(&self) -> Result<Document, IntakeError> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| {
            IntakeError::ParseFailure(format!("Failed to open Excel file: {}", e))
        })?;

        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            IntakeError::ParseFailure("Workbook contains no worksheets".to_string())
        })?;
        debug!(path = %self.path.display(), sheet = %sheet_name, "parsing worksheet");

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            IntakeError::ParseFailure(format!("Failed to read worksheet '{}': {}", sheet_name, e))
        })?;

        Ok(Self::process_sheet(&range).with_origin(&self.path))
    }

    /// Turn a worksheet range into a document (first used row is the header).
    ///
    /// calamine trims the range to the first used cell; blank leading columns
    /// of the sheet are restored as empty `Unnamed: N` columns.
    fn process_sheet(range: &Range<Data>) -> Document {
        let Some((_, first_col)) = range.start() else {
            return Document::new();
        };
        if range.is_empty() {
            return Document::new();
        }
        let (height, width) = range.get_size();
        let leading = first_col as usize;

        // `col` is the absolute sheet column; cells before `leading` are blank
        let cell_at =
            |row: usize, col: usize| col.checked_sub(leading).and_then(|c| range.get((row, c)));

        let names = dedupe_headers(
            (0..leading + width)
                .map(|col| match cell_at(0, col) {
                    Some(Data::Empty) | None => String::new(),
                    Some(cell) => Self::convert_cell(cell).to_string(),
                })
                .collect(),
        );

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(col, name)| {
                let cells = (1..height)
                    .map(|row| cell_at(row, col).map_or(Cell::Empty, Self::convert_cell))
                    .collect();
                Column::infer_from_cells(name, cells)
            })
            .collect();

        Document::from_columns(columns)
    }

    /// Convert a calamine cell to a document cell
    fn convert_cell(cell: &Data) -> Cell {
        match cell {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Boolean(*b),
            Data::String(s) if s.is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::DateTime(dt) => from_excel_serial(dt.as_f64())
                .map_or_else(|| Cell::Number(dt.as_f64()), Cell::DateTime),
            Data::DateTimeIso(s) => Self::parse_iso(s)
                .map_or_else(|| Cell::Text(s.clone()), Cell::DateTime),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }

    fn parse_iso(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValue;

    #[test]
    fn test_convert_cell_kinds() {
        assert_eq!(ExcelImporter::convert_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(ExcelImporter::convert_cell(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(ExcelImporter::convert_cell(&Data::Bool(true)), Cell::Boolean(true));
        assert_eq!(ExcelImporter::convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String(String::new())),
            Cell::Empty
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String("x".into())),
            Cell::Text("x".into())
        );
    }

    #[test]
    fn test_parse_iso() {
        let dt = ExcelImporter::parse_iso("2024-02-29T08:00:00").unwrap();
        assert_eq!(dt.to_string(), "2024-02-29 08:00:00");
        let day = ExcelImporter::parse_iso("2024-02-29").unwrap();
        assert_eq!(day.to_string(), "2024-02-29 00:00:00");
        assert!(ExcelImporter::parse_iso("PT1H").is_none());
    }

    #[test]
    fn test_process_sheet_header_and_types() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("name".into()));
        range.set_value((0, 1), Data::Float(2024.0));
        range.set_value((1, 0), Data::String("north".into()));
        range.set_value((1, 1), Data::Float(10.0));
        range.set_value((1, 2), Data::Bool(true));
        range.set_value((2, 0), Data::String("south".into()));
        range.set_value((2, 1), Data::Int(12));

        let doc = ExcelImporter::process_sheet(&range);

        assert_eq!(doc.column_names(), vec!["name", "2024", "Unnamed: 2"]);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(
            doc.column("2024").unwrap().values,
            ColumnValue::Number(vec![Some(10.0), Some(12.0)])
        );
        assert_eq!(
            doc.column("Unnamed: 2").unwrap().values,
            ColumnValue::Boolean(vec![Some(true), None])
        );
    }

    #[test]
    fn test_process_sheet_keeps_blank_leading_column() {
        // Used range B1:C3, as calamine returns it for a sheet with column A blank
        let mut range: Range<Data> = Range::new((0, 1), (2, 2));
        range.set_value((0, 1), Data::String("site".into()));
        range.set_value((0, 2), Data::String("depth".into()));
        range.set_value((1, 1), Data::String("W-01".into()));
        range.set_value((1, 2), Data::Float(3.0));
        range.set_value((2, 1), Data::String("W-02".into()));
        range.set_value((2, 2), Data::Float(4.5));

        let doc = ExcelImporter::process_sheet(&range);

        assert_eq!(doc.column_names(), vec!["Unnamed: 0", "site", "depth"]);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(
            doc.column("Unnamed: 0").unwrap().values,
            ColumnValue::Text(vec![None, None])
        );
        assert_eq!(
            doc.column("depth").unwrap().values,
            ColumnValue::Number(vec![Some(3.0), Some(4.5)])
        );
    }

    #[test]
    fn test_process_empty_sheet() {
        let range: Range<Data> = Range::empty();
        let doc = ExcelImporter::process_sheet(&range);
        assert_eq!(doc.row_count(), 0);
        assert!(doc.columns().is_empty());
    }
}
