//! sheetpass - load a CSV or Excel table, save it again as CSV or Excel
//!
//! One document is active at a time. Loading replaces it; a successful save
//! writes it out and clears the slot, so every export needs a fresh load.
//!
//! # Example
//!
//! ```no_run
//! use sheetpass::session::Session;
//! use std::path::Path;
//!
//! let mut session = Session::new();
//! session.open(Path::new("input.csv")).result?;
//! session.save_excel(Path::new("output.xlsx")).result?;
//! assert!(!session.export_enabled());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod delimited;
pub mod error;
pub mod excel;
pub mod export;
pub mod intake;
pub mod session;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use error::{ExportError, IntakeError, SheetpassError, SheetpassResult};
pub use session::{Notice, NoticeLevel, Session, StatusIndicator};
pub use transform::{Passthrough, Transform};
pub use types::{Cell, Column, ColumnValue, Document, SupportedFormat};
