//! Error types for the linking pass.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkError>;

/// Failures surfaced by the linker.
///
/// Only entry resolution is reported as an error value; everything else the
/// pass encounters degrades to a [`Diagnostic`](crate::Diagnostic).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    /// A module reference matched no known chunk.
    #[error("unresolved module reference: {reference}")]
    UnresolvedReference { reference: String },

    /// A module reference points outside the chunk set (URL or bare package name).
    #[error("module reference is not a local chunk: {reference}")]
    NonLocalReference { reference: String },

    /// The entry reference matched no known chunk.
    #[error("entry chunk not found: {reference}")]
    UnresolvedEntry { reference: String },
}
