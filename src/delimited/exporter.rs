//! CSV exporter implementation - Document → CSV

use crate::error::ExportError;
use crate::types::{
    format_number, is_midnight, Column, ColumnValue, Document, DATETIME_FORMAT, DATE_FORMAT,
};
use std::path::Path;

/// CSV exporter for a loaded document
pub struct CsvExporter<'a> {
    document: &'a Document,
}

impl<'a> CsvExporter<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Write the document to `output_path`.
    ///
    /// The whole body is rendered before the file is opened, so a rendering
    /// failure never leaves a truncated file behind.
    pub fn export(&self, output_path: &Path) -> Result<(), ExportError> {
        let bytes = self.to_bytes()?;
        std::fs::write(output_path, bytes).map_err(|e| {
            ExportError::WriteFailure(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ))
        })
    }

    /// Render the document as CSV bytes: header row, then one line per record
    pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let columns = self.document.columns();
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if !columns.is_empty() {
            writer
                .write_record(columns.iter().map(|c| c.name.as_str()))
                .map_err(|e| ExportError::WriteFailure(format!("Failed to write header: {}", e)))?;
        }

        let date_only: Vec<bool> = columns.iter().map(Self::is_date_only).collect();

        for row in 0..self.document.row_count() {
            let fields = columns
                .iter()
                .zip(&date_only)
                .map(|(column, &date_only)| Self::render(column, row, date_only));
            writer
                .write_record(fields)
                .map_err(|e| ExportError::WriteFailure(format!("Failed to write row {}: {}", row + 1, e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::WriteFailure(format!("Failed to flush CSV: {}", e)))
    }

    /// Date/time columns print as plain dates when every value is at midnight
    fn is_date_only(column: &Column) -> bool {
        match &column.values {
            ColumnValue::DateTime(values) => values.iter().flatten().all(is_midnight),
            _ => false,
        }
    }

    fn render(column: &Column, row: usize, date_only: bool) -> String {
        match &column.values {
            ColumnValue::Number(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(format_number)
                .unwrap_or_default(),
            ColumnValue::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
            ColumnValue::Boolean(v) => match v.get(row).copied().flatten() {
                Some(true) => "True".to_string(),
                Some(false) => "False".to_string(),
                None => String::new(),
            },
            ColumnValue::DateTime(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|dt| {
                    let fmt = if date_only { DATE_FORMAT } else { DATETIME_FORMAT };
                    dt.format(fmt).to_string()
                })
                .unwrap_or_default(),
        }
    }
}
