//! Intake handler: validate a candidate path and parse it into a `Document`

use crate::delimited::CsvImporter;
use crate::error::IntakeError;
use crate::excel::ExcelImporter;
use crate::types::{Document, SupportedFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Load a CSV or XLSX file.
///
/// The format comes from the extension alone. The path must name an existing
/// regular file; anything unreadable or malformed is a `ParseFailure`.
pub fn load(path: &Path) -> Result<Document, IntakeError> {
    let format = SupportedFormat::from_path(path).ok_or_else(|| {
        warn!(path = %path.display(), "rejected unsupported extension");
        IntakeError::UnsupportedFormat(path.to_path_buf())
    })?;

    if !path.is_file() {
        return Err(IntakeError::ParseFailure(format!(
            "No such file: {}",
            path.display()
        )));
    }

    debug!(path = %path.display(), %format, "dispatching reader");
    match format {
        SupportedFormat::Csv => CsvImporter::new(path).import(),
        SupportedFormat::Xlsx => ExcelImporter::new(path).import(),
    }
}

/// Load a path delivered by a drag-and-drop transport
pub fn load_dropped(payload: &str) -> Result<Document, IntakeError> {
    load(&dropped_path(payload))
}

/// Undo drag-and-drop quoting: trim, then strip one pair of enclosing braces
pub fn dropped_path(payload: &str) -> PathBuf {
    let trimmed = payload.trim();
    let unwrapped = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);
    PathBuf::from(unwrapped)
}
