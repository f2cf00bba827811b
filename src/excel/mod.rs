//! Excel (.xlsx) import/export
//!
//! - Import: first worksheet → `Document`
//! - Export: `Document` → single default worksheet

mod exporter;
mod importer;

pub use exporter::{ExcelExporter, SHEET_NAME};
pub use importer::ExcelImporter;
