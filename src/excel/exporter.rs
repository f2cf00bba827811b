//! Excel exporter implementation - Document → Excel (.xlsx)

use crate::error::ExportError;
use crate::types::{to_excel_serial, ColumnValue, Document};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Name of the single worksheet written on export
pub const SHEET_NAME: &str = "Sheet1";

const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Excel exporter: one worksheet, header in row 0, no index column
pub struct ExcelExporter<'a> {
    document: &'a Document,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Export the document to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| ExportError::WriteFailure(format!("Failed to set worksheet name: {}", e)))?;

        self.write_sheet(worksheet)?;

        workbook
            .save(output_path)
            .map_err(|e| ExportError::WriteFailure(format!("Failed to save Excel file: {}", e)))
    }

    fn write_sheet(&self, worksheet: &mut Worksheet) -> Result<(), ExportError> {
        let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);

        for (col_idx, column) in self.document.columns().iter().enumerate() {
            let col = u16::try_from(col_idx).map_err(|_| {
                ExportError::WriteFailure(format!("Too many columns for Excel: {}", col_idx + 1))
            })?;

            worksheet
                .write_string(0, col, &column.name)
                .map_err(|e| ExportError::WriteFailure(format!("Failed to write header: {}", e)))?;

            for row_idx in 0..column.len() {
                // +1 for header row
                let row = u32::try_from(row_idx + 1).map_err(|_| {
                    ExportError::WriteFailure(format!("Too many rows for Excel: {}", row_idx + 1))
                })?;
                Self::write_cell_value(worksheet, row, col, &column.values, row_idx, &datetime_format)?;
            }
        }
        Ok(())
    }

    /// Write one cell; empty cells are left unwritten
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        values: &ColumnValue,
        index: usize,
        datetime_format: &Format,
    ) -> Result<(), ExportError> {
        let result = match values {
            ColumnValue::Number(nums) => match nums.get(index).copied().flatten() {
                Some(value) => worksheet.write_number(row, col, value).map(|_| ()),
                None => Ok(()),
            },
            ColumnValue::Text(texts) => match texts.get(index).and_then(Option::as_deref) {
                Some(value) => worksheet.write_string(row, col, value).map(|_| ()),
                None => Ok(()),
            },
            ColumnValue::Boolean(bools) => match bools.get(index).copied().flatten() {
                Some(value) => worksheet.write_boolean(row, col, value).map(|_| ()),
                None => Ok(()),
            },
            ColumnValue::DateTime(dates) => match dates.get(index).copied().flatten() {
                Some(value) => worksheet
                    .write_number_with_format(row, col, to_excel_serial(&value), datetime_format)
                    .map(|_| ()),
                None => Ok(()),
            },
        };

        result.map_err(|e| {
            ExportError::WriteFailure(format!(
                "Failed to write {} cell at row {}, column {}: {}",
                values.type_name(),
                row + 1,
                col + 1,
                e
            ))
        })
    }
}
