//! Export handler: serialize a `Document` in the chosen format

use crate::delimited::CsvExporter;
use crate::error::ExportError;
use crate::excel::ExcelExporter;
use crate::types::{Document, SupportedFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write the full document to `path`. The row index is never written.
pub fn export(doc: &Document, path: &Path, format: SupportedFormat) -> Result<(), ExportError> {
    debug!(
        path = %path.display(),
        %format,
        rows = doc.row_count(),
        columns = doc.columns().len(),
        "writing document"
    );
    match format {
        SupportedFormat::Csv => CsvExporter::new(doc).export(path),
        SupportedFormat::Xlsx => ExcelExporter::new(doc).export(path),
    }
}

/// Save-dialog behaviour: append the format's extension when the path has none
pub fn with_default_extension(path: &Path, format: SupportedFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}
