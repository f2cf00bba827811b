//! Transformation stage between intake and the active document slot

use crate::types::Document;

/// A step applied to every freshly loaded document before it is stored.
///
/// The stored document is whatever `apply` returns.
pub trait Transform {
    fn apply(&self, document: Document) -> Document;
}

/// Identity transform: the document is stored exactly as read
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Transform for Passthrough {
    fn apply(&self, document: Document) -> Document {
        document
    }
}

impl<F> Transform for F
where
    F: Fn(Document) -> Document,
{
    fn apply(&self, document: Document) -> Document {
        self(document)
    }
}
