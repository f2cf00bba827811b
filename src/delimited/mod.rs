//! CSV import/export
//!
//! - Import: comma-delimited text with a header row → `Document`
//! - Export: `Document` → comma-delimited text with a header row, no index column

mod exporter;
mod importer;

pub use exporter::CsvExporter;
pub use importer::CsvImporter;
