//! Release notes renderers

mod markdown;

pub use markdown::MarkdownRenderer;

use crate::document::ReleaseNotesDocument;

/// Trait for release notes renderers
pub trait NotesRenderer: Send + Sync {
    /// Render a document to string
    fn render(&self, document: &ReleaseNotesDocument) -> String;
}
