//! CSV importer implementation - CSV → Document

use crate::error::IntakeError;
use crate::types::{dedupe_headers, Column, Document};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV importer: header row names the columns, every later row is a record
pub struct CsvImporter {
    path: PathBuf,
}

impl CsvImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read and parse the file
    pub fn import(&self) -> Result<Document, IntakeError> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            IntakeError::ParseFailure(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let content = decode(bytes);
        debug!(path = %self.path.display(), bytes = content.len(), "parsing CSV");
        Ok(Self::parse_str(&content)?.with_origin(&self.path))
    }

    /// Parse CSV text already in memory
    pub fn parse_str(content: &str) -> Result<Document, IntakeError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Err(IntakeError::ParseFailure(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = match records.next() {
            Some(result) => result.map_err(|e| IntakeError::ParseFailure(e.to_string()))?,
            None => {
                return Err(IntakeError::ParseFailure(
                    "No columns to parse from file".to_string(),
                ))
            }
        };
        let names = dedupe_headers(header.iter().map(str::to_string).collect());
        let width = names.len();

        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

        for result in records {
            let record = result.map_err(|e| IntakeError::ParseFailure(e.to_string()))?;
            if record.len() > width {
                let line = record.position().map_or(0, |p| p.line());
                return Err(IntakeError::ParseFailure(format!(
                    "Error tokenizing data. Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }
            for (col_idx, column) in columns.iter_mut().enumerate() {
                let field = record.get(col_idx).filter(|f| !f.is_empty());
                column.push(field.map(str::to_string));
            }
        }

        let columns = names
            .into_iter()
            .zip(columns)
            .map(|(name, fields)| Column::infer_from_text(name, fields))
            .collect();

        Ok(Document::from_columns(columns))
    }
}

/// UTF-8 first, Windows-1252 otherwise (common for spreadsheet-exported CSVs)
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
