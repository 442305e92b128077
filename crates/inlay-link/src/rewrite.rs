//! Import / export rewriting and namespace wrapping.
//!
//! Rewriting walks a chunk's segments once. Code segments are copied, and
//! statement segments are replaced according to where their module reference
//! resolved:
//!
//! ```text
//! import { a as b } from "./x.js";   ->  const { a: b } = __ns_x;
//! import "./x.js";                   ->  ;
//! export { a as b, c };              ->  (removed, becomes `return { b: a, c: c };`)
//! export { a as b } from "./x.js";   ->  (removed, becomes `b: __ns_x.a` in the return)
//! ```
//!
//! Statements whose reference did not resolve to a wrapped chunk are kept
//! verbatim.

use indexmap::IndexMap;

use crate::chunk::Chunk;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::namespace::NamespaceMap;
use crate::specifier::{Binding, Statement};

pub struct Rewriter<'a> {
    chunks: &'a IndexMap<String, Chunk>,
    namespaces: &'a NamespaceMap,
}

impl<'a> Rewriter<'a> {
    pub fn new(chunks: &'a IndexMap<String, Chunk>, namespaces: &'a NamespaceMap) -> Self {
        Self { chunks, namespaces }
    }

    /// Rewrite a chunk's statements without wrapping it. Used for the entry,
    /// whose top-level scope becomes the script scope.
    pub fn rewrite_body(&self, chunk: &Chunk, diagnostics: &mut Diagnostics) -> String {
        let mut body = String::with_capacity(chunk.code.len());
        let mut clauses_seen = 0;

        for segment in &chunk.segments {
            let Some(statement) = segment.statement() else {
                body.push_str(&segment.text);
                continue;
            };

            match statement {
                Statement::NamedImport { bindings, source } => {
                    match self.target_namespace(chunk, source) {
                        Some((target, _)) if bindings.is_empty() => {
                            tracing::trace!(chunk = %chunk.id, to = target, "dropping empty import");
                            body.push(';');
                        }
                        Some((target, ns)) => {
                            self.check_exports(chunk, source, target, bindings, diagnostics);
                            body.push_str(&destructure(bindings, ns));
                        }
                        None => body.push_str(&segment.text),
                    }
                }
                Statement::BareImport { source } => {
                    if self.target_namespace(chunk, source).is_some() {
                        body.push(';');
                    } else {
                        body.push_str(&segment.text);
                    }
                }
                Statement::ReExport { bindings, source } => {
                    match self.target_namespace(chunk, source) {
                        Some((target, _)) => {
                            self.check_exports(chunk, source, target, bindings, diagnostics);
                        }
                        None => body.push_str(&segment.text),
                    }
                }
                Statement::ExportClause { .. } => {
                    clauses_seen += 1;
                    if clauses_seen > 1 {
                        diagnostics.push(
                            Diagnostic::warning(
                                DiagnosticKind::DuplicateExportClause,
                                "only the first export clause of a chunk is honored",
                            )
                            .in_chunk(&chunk.id)
                            .with_help(segment.text.trim().to_string()),
                        );
                    }
                }
            }
        }

        body
    }

    /// Rewrite a chunk and wrap it as `const <ns> = (() => { ... })();`.
    pub fn rewrite_wrapped(
        &self,
        chunk: &Chunk,
        namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let body = self.rewrite_body(chunk, diagnostics);
        let exports = self.export_object(chunk);
        wrap(namespace, body.trim_end_matches('\n'), &exports)
    }

    /// Object literal the wrapper returns: exported alias as key, local
    /// binding (or `ns.name` for re-exports) as value.
    pub fn export_object(&self, chunk: &Chunk) -> String {
        let entries: Vec<String> = chunk
            .export_specifiers
            .iter()
            .filter_map(|spec| match &spec.source_ref {
                None => Some(format!("{}: {}", spec.exported_alias, spec.local_name)),
                Some(source) => self
                    .target_namespace(chunk, source)
                    .map(|(_, ns)| format!("{}: {ns}.{}", spec.exported_alias, spec.local_name)),
            })
            .collect();

        if entries.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", entries.join(", "))
        }
    }

    fn target_namespace(&self, chunk: &Chunk, source: &str) -> Option<(&'a str, &'a str)> {
        let target = chunk.resolution(source)?;
        let (target, _) = self.chunks.get_key_value(target)?;
        let ns = self.namespaces.get(target)?;
        Some((target.as_str(), ns))
    }

    fn check_exports(
        &self,
        chunk: &Chunk,
        source: &str,
        target: &str,
        bindings: &[Binding],
        diagnostics: &mut Diagnostics,
    ) {
        let Some(target_chunk) = self.chunks.get(target) else {
            return;
        };
        for binding in bindings {
            if !target_chunk.exported_names().any(|name| name == binding.name) {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::MissingExport,
                        format!("'{}' is not exported by {target}", binding.name),
                    )
                    .in_chunk(&chunk.id)
                    .with_reference(source)
                    .with_help(format!("'{}' will be undefined", binding.alias)),
                );
            }
        }
    }
}

/// `const { a: b, c: c } = ns;`
pub fn destructure(bindings: &[Binding], namespace: &str) -> String {
    let pairs: Vec<String> = bindings
        .iter()
        .map(|b| format!("{}: {}", b.name, b.alias))
        .collect();
    format!("const {{ {} }} = {namespace};", pairs.join(", "))
}

/// Eagerly evaluated closure holding one chunk's scope.
pub fn wrap(namespace: &str, body: &str, exports: &str) -> String {
    format!("const {namespace} = (() => {{\n{body}\nreturn {exports};\n}})();")
}
