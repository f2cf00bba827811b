//! Application state: the single active-document slot and its status indicator
//!
//! A `Session` is owned by whatever front end drives it (the CLI session loop,
//! a GUI event loop, a test). Each user action maps to one method here:
//!
//! | action          | method          |
//! |-----------------|-----------------|
//! | browse / open   | [`Session::open`]        |
//! | drag-and-drop   | [`Session::drop_payload`] |
//! | save as CSV     | [`Session::save_csv`]    |
//! | save as Excel   | [`Session::save_excel`]  |
//! | reset           | [`Session::reset`]       |
//!
//! State machine:
//!
//! ```text
//! EMPTY  --load ok-->     LOADED --export ok--> EMPTY
//! EMPTY  --load failed--> EMPTY
//! LOADED --load ok-->     LOADED (document replaced)
//! LOADED --export failed--> LOADED
//! ```

use crate::error::{ExportError, IntakeError};
use crate::export;
use crate::intake;
use crate::transform::{Passthrough, Transform};
use crate::types::{Document, SupportedFormat};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

pub const IDLE_TEXT: &str = "Drop CSV or Excel File Here";
pub const PROCESSED_TEXT: &str = "File processed successfully!";
pub const UPLOADED_TEXT: &str = "File uploaded!";
pub const IDLE_BACKGROUND: &str = "#ffffff";
pub const SUCCESS_BACKGROUND: &str = "#d1ffd6";

/// Severity of a notice, mirroring info/warning/error dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// What the user is told after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Drop-zone label: text plus background colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub text: &'static str,
    pub background: &'static str,
}

impl StatusIndicator {
    pub fn idle() -> Self {
        Self {
            text: IDLE_TEXT,
            background: IDLE_BACKGROUND,
        }
    }

    fn success(text: &'static str) -> Self {
        Self {
            text,
            background: SUCCESS_BACKGROUND,
        }
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::idle()
    }
}

/// Outcome of a session action: the underlying result plus the notice to show
#[derive(Debug)]
pub struct Outcome<E> {
    pub result: Result<(), E>,
    pub notice: Option<Notice>,
}

impl<E> Outcome<E> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Owner of the active document
pub struct Session<T: Transform = Passthrough> {
    active: Option<Document>,
    status: StatusIndicator,
    transform: T,
}

impl Default for Session<Passthrough> {
    fn default() -> Self {
        Self::new()
    }
}

impl Session<Passthrough> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_transform(Passthrough)
    }
}

impl<T: Transform> Session<T> {
    /// Session that runs `transform` on every loaded document before storing it
    pub fn with_transform(transform: T) -> Self {
        Self {
            active: None,
            status: StatusIndicator::idle(),
            transform,
        }
    }

    pub fn active(&self) -> Option<&Document> {
        self.active.as_ref()
    }

    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    /// Export controls are enabled exactly when a document is loaded
    pub fn export_enabled(&self) -> bool {
        self.active.is_some()
    }

    /// Browse/open action
    pub fn open(&mut self, path: &Path) -> Outcome<IntakeError> {
        let result = intake::load(path);
        self.finish_intake(result, PROCESSED_TEXT, "File must be a CSV or Excel file.")
    }

    /// Drag-and-drop action; `payload` is the raw string the transport delivered
    pub fn drop_payload(&mut self, payload: &str) -> Outcome<IntakeError> {
        let result = intake::load_dropped(payload);
        self.finish_intake(result, UPLOADED_TEXT, "Please drop a valid CSV or Excel file.")
    }

    fn finish_intake(
        &mut self,
        result: Result<Document, IntakeError>,
        success_text: &'static str,
        unsupported_message: &str,
    ) -> Outcome<IntakeError> {
        match result {
            Ok(document) => {
                let document = self.transform.apply(document);
                info!(
                    rows = document.row_count(),
                    columns = document.columns().len(),
                    replaced = self.active.is_some(),
                    "document loaded"
                );
                self.active = Some(document);
                self.status = StatusIndicator::success(success_text);
                Outcome {
                    result: Ok(()),
                    notice: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "intake failed, keeping previous state");
                let notice = match &err {
                    IntakeError::UnsupportedFormat(_) => {
                        Notice::warning("Invalid File", unsupported_message)
                    }
                    IntakeError::ParseFailure(msg) => {
                        Notice::error("Error", format!("Failed to process file:\n{}", msg))
                    }
                };
                Outcome {
                    result: Err(err),
                    notice: Some(notice),
                }
            }
        }
    }

    /// Save-as-CSV action
    pub fn save_csv(&mut self, path: &Path) -> Outcome<ExportError> {
        self.save(path, SupportedFormat::Csv)
    }

    /// Save-as-Excel action
    pub fn save_excel(&mut self, path: &Path) -> Outcome<ExportError> {
        self.save(path, SupportedFormat::Xlsx)
    }

    /// Export the active document; on success the slot is cleared
    pub fn save(&mut self, path: &Path, format: SupportedFormat) -> Outcome<ExportError> {
        let Some(document) = self.active.as_ref() else {
            warn!(path = %path.display(), "export requested with nothing loaded");
            return Outcome {
                result: Err(ExportError::NothingLoaded),
                notice: Some(Notice::warning(
                    "Warning",
                    "No file has been processed yet.",
                )),
            };
        };

        let target = export::with_default_extension(path, format);
        match export::export(document, &target, format) {
            Ok(()) => {
                info!(path = %target.display(), %format, "document exported");
                self.reset();
                Outcome {
                    result: Ok(()),
                    notice: Some(Notice::info(
                        "Saved",
                        format!("File saved as {}!", format.label()),
                    )),
                }
            }
            Err(err) => {
                warn!(path = %target.display(), error = %err, "export failed, document kept");
                let notice = Notice::error("Error", format!("Failed to save file:\n{}", err));
                Outcome {
                    result: Err(err),
                    notice: Some(notice),
                }
            }
        }
    }

    /// Clear the active document and return the indicator to idle
    pub fn reset(&mut self) {
        self.active = None;
        self.status = StatusIndicator::idle();
    }
}
