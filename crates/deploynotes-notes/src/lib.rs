//! deploynotes Notes - commit classification and release notes rendering
//!
//! This crate turns enriched commits into a [`ReleaseNotesDocument`] and
//! renders it as markdown.

pub mod classifier;
pub mod document;
pub mod formatter;

pub use classifier::{ClassifiedCommit, CommitClassifier, PolicyClassifier, Verdict};
pub use document::{NoteSection, NotesMetadata, ReleaseNotesDocument};
pub use formatter::{MarkdownRenderer, NotesRenderer};
