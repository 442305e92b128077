use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use crate::specifier::{self, Segment, Statement};

/// Chunk dictionary handed to the linker: chunk id (emitted file name) to code.
pub type ChunkMap = indexmap::IndexMap<String, String>;

/// A named binding pulled from another chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub imported_name: String,
    pub local_alias: String,
}

/// One entry of an import statement. Bare imports have no binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    pub source_ref: String,
    pub binding: Option<ImportBinding>,
}

/// One exported name. Re-exported names also carry the module they come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    pub local_name: String,
    pub exported_alias: String,
    pub source_ref: Option<String>,
}

/// One compiled module unit taking part in a link pass.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: String,
    /// Module text as read. Rewriting produces new strings and leaves it untouched.
    pub code: String,
    pub segments: Vec<Segment>,
    pub import_specifiers: Vec<ImportSpecifier>,
    pub export_specifiers: Vec<ExportSpecifier>,
    /// Module reference to the chunk id it resolved to.
    pub resolved: FxHashMap<String, String>,
    export_clauses: usize,
}

impl Chunk {
    /// Parse `code` into segments and specifier lists.
    pub fn parse(id: impl Into<String>, code: impl Into<String>) -> Self {
        let id = id.into();
        let code = code.into();
        let segments = specifier::scan(&code);

        let mut import_specifiers = Vec::new();
        let mut export_specifiers = Vec::new();
        let mut reexports = Vec::new();
        let mut export_clauses = 0;

        for statement in segments.iter().filter_map(Segment::statement) {
            match statement {
                Statement::NamedImport { bindings, source } if bindings.is_empty() => {
                    import_specifiers.push(ImportSpecifier {
                        source_ref: source.clone(),
                        binding: None,
                    });
                }
                Statement::NamedImport { bindings, source } => {
                    import_specifiers.extend(bindings.iter().map(|b| ImportSpecifier {
                        source_ref: source.clone(),
                        binding: Some(ImportBinding {
                            imported_name: b.name.clone(),
                            local_alias: b.alias.clone(),
                        }),
                    }));
                }
                Statement::BareImport { source } => {
                    import_specifiers.push(ImportSpecifier {
                        source_ref: source.clone(),
                        binding: None,
                    });
                }
                Statement::ReExport { bindings, source } => {
                    reexports.extend(bindings.iter().map(|b| ExportSpecifier {
                        local_name: b.name.clone(),
                        exported_alias: b.alias.clone(),
                        source_ref: Some(source.clone()),
                    }));
                }
                Statement::ExportClause { bindings } => {
                    // Only the first (consolidated) clause supplies exports.
                    if export_clauses == 0 {
                        export_specifiers.extend(bindings.iter().map(|b| ExportSpecifier {
                            local_name: b.name.clone(),
                            exported_alias: b.alias.clone(),
                            source_ref: None,
                        }));
                    }
                    export_clauses += 1;
                }
            }
        }
        export_specifiers.extend(reexports);

        Self {
            id,
            code,
            segments,
            import_specifiers,
            export_specifiers,
            resolved: FxHashMap::default(),
            export_clauses,
        }
    }

    /// Distinct module references of imports and re-exports, in order of appearance.
    pub fn sources(&self) -> Vec<&str> {
        let sources: IndexSet<&str> = self
            .segments
            .iter()
            .filter_map(Segment::statement)
            .filter_map(Statement::source)
            .collect();
        sources.into_iter().collect()
    }

    /// Names other chunks can import from this one.
    pub fn exported_names(&self) -> impl Iterator<Item = &str> {
        self.export_specifiers
            .iter()
            .map(|spec| spec.exported_alias.as_str())
    }

    /// Number of plain `export { ... }` clauses found (re-exports excluded).
    pub fn export_clause_count(&self) -> usize {
        self.export_clauses
    }

    /// Chunk id this chunk's `source_ref` resolved to during graph construction.
    pub fn resolution(&self, source_ref: &str) -> Option<&str> {
        self.resolved.get(source_ref).map(String::as_str)
    }

    /// True when any import or export statement was recognized.
    pub fn has_module_syntax(&self) -> bool {
        self.segments.iter().any(|s| s.statement().is_some())
    }
}
