//! Structured diagnostics collected during a link pass.
//!
//! The linker never logs warnings on its own. Every recoverable problem is
//! appended to a [`Diagnostics`] collector that the caller receives with the
//! result, so a pass stays free of side effects and easy to assert on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One recoverable problem found while linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Chunk the problem was found in, if any.
    pub chunk: Option<String>,
    /// Module reference involved, if any.
    pub reference: Option<String>,
    pub help: Option<String>,
}

/// Diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnresolvedImport,
    AmbiguousImport,
    EntryImported,
    MissingExport,
    DuplicateExportClause,
    CircularDependency,
    UnresolvedEntry,
    UnsupportedAsset,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedImport => "unresolved_import",
            DiagnosticKind::AmbiguousImport => "ambiguous_import",
            DiagnosticKind::EntryImported => "entry_imported",
            DiagnosticKind::MissingExport => "missing_export",
            DiagnosticKind::DuplicateExportClause => "duplicate_export_clause",
            DiagnosticKind::CircularDependency => "circular_dependency",
            DiagnosticKind::UnresolvedEntry => "unresolved_entry",
            DiagnosticKind::UnsupportedAsset => "unsupported_asset",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Warning,
    Info,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            chunk: None,
            reference: None,
            help: None,
        }
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Info,
            ..Self::warning(kind, message)
        }
    }

    pub fn in_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.chunk = Some(chunk.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, DiagnosticSeverity::Warning)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if let Some(chunk) = &self.chunk {
            write!(f, " (in {chunk})")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

/// Append-only diagnostics channel for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(kind = diagnostic.kind.as_str(), "{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of one kind, in the order they were recorded.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(Diagnostic::is_warning)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_context() {
        let diagnostic = Diagnostic::warning(DiagnosticKind::UnresolvedImport, "no chunk")
            .in_chunk("assets/a.js")
            .with_reference("./b.js")
            .with_help("check the chunk set");

        assert!(diagnostic.is_warning());
        assert_eq!(diagnostic.chunk.as_deref(), Some("assets/a.js"));
        assert_eq!(diagnostic.reference.as_deref(), Some("./b.js"));
        assert_eq!(
            diagnostic.to_string(),
            "[unresolved_import] no chunk (in assets/a.js)\n  help: check the chunk set"
        );
    }

    #[test]
    fn info_is_not_a_warning() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::info(DiagnosticKind::CircularDependency, "cycle"));
        assert!(!diagnostics.has_warnings());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.of_kind(DiagnosticKind::CircularDependency).count(),
            1
        );
    }
}
