use std::path::PathBuf;
use thiserror::Error;

pub type SheetpassResult<T> = Result<T, SheetpassError>;

/// Why a file could not become the active document
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Unsupported file format: {} (expected .csv or .xlsx)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{0}")]
    ParseFailure(String),
}

/// Why the active document could not be written
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No file has been processed yet")]
    NothingLoaded,

    #[error("{0}")]
    WriteFailure(String),
}

#[derive(Error, Debug)]
pub enum SheetpassError {
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Usage error: {0}")]
    Usage(String),
}
