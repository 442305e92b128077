//! Link pass driver: resolve the entry, order, allocate, rewrite, concatenate.

use crate::chunk::ChunkMap;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{LinkError, Result};
use crate::graph::DependencyGraph;
use crate::namespace::{DEFAULT_PREFIX, NamespaceMap};
use crate::resolver::{Resolved, Resolver};
use crate::rewrite::Rewriter;
use crate::sequence::sequence;

/// Options for a link pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Prefix of every allocated namespace identifier.
    pub namespace_prefix: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            namespace_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl LinkOptions {
    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }
}

/// Result of linking one entry chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutput {
    /// Flat script without module syntax.
    pub script: String,
    /// Byte offset in `script` where the rewritten entry body starts, after
    /// every namespace wrapper.
    pub entry_start: usize,
    /// Entry id followed by every wrapped chunk id, in emission order.
    pub consumed: Vec<String>,
    pub namespaces: NamespaceMap,
    pub diagnostics: Diagnostics,
}

impl LinkOutput {
    pub fn entry(&self) -> &str {
        self.consumed.first().map(String::as_str).unwrap_or_default()
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.has_warnings()
    }

    /// The namespace wrappers, each followed by a newline.
    pub fn wrappers(&self) -> &str {
        &self.script[..self.entry_start]
    }

    /// The rewritten entry chunk.
    pub fn entry_body(&self) -> &str {
        &self.script[self.entry_start..]
    }
}

/// Links entry chunks from one chunk dictionary.
///
/// The dictionary is only read, so one linker can serve many entries, also
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct Linker<'a> {
    chunks: &'a ChunkMap,
    resolver: Resolver<'a>,
    options: LinkOptions,
}

impl<'a> Linker<'a> {
    pub fn new(chunks: &'a ChunkMap, options: LinkOptions) -> Self {
        Self {
            chunks,
            resolver: Resolver::from_chunks(chunks),
            options,
        }
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Resolve the reference a page uses to load its entry script.
    ///
    /// `importer` is the referencing document's name, if any.
    pub fn resolve_entry(&self, reference: &str, importer: Option<&str>) -> Result<Resolved<'a>> {
        self.resolver
            .resolve(reference, importer)
            .map_err(|_| LinkError::UnresolvedEntry {
                reference: reference.to_string(),
            })
    }

    /// Resolve `reference` and link it.
    pub fn link(&self, reference: &str, importer: Option<&str>) -> Result<LinkOutput> {
        let entry = self.resolve_entry(reference, importer)?;
        let mut output = self.link_resolved(entry.id);
        if entry.is_ambiguous() {
            output.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::AmbiguousImport,
                    format!(
                        "entry '{reference}' matches {} chunks by file name, using {}",
                        entry.candidates, entry.id
                    ),
                )
                .with_reference(reference),
            );
        }
        Ok(output)
    }

    /// Link the chunk with id `entry_id`.
    pub fn link_resolved(&self, entry_id: &str) -> LinkOutput {
        let mut diagnostics = Diagnostics::new();
        let build = DependencyGraph::build(self.chunks, entry_id, &self.resolver, &mut diagnostics);
        let sequence = sequence(&build.graph);

        for cycle in &sequence.cycles {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::CircularDependency,
                    format!("circular chunk imports: {}", cycle.join(" -> ")),
                )
                .in_chunk(cycle.first().cloned().unwrap_or_default())
                .with_help("chunks on a cycle may observe each other's bindings before initialization"),
            );
        }

        let namespaces = NamespaceMap::allocate(
            sequence.order.iter().map(String::as_str),
            &self.options.namespace_prefix,
        );
        let rewriter = Rewriter::new(&build.chunks, &namespaces);

        let mut parts = Vec::with_capacity(sequence.order.len());
        let mut consumed = Vec::with_capacity(sequence.order.len() + 1);
        consumed.push(entry_id.to_string());

        for id in &sequence.order {
            let (Some(chunk), Some(ns)) = (build.chunks.get(id), namespaces.get(id)) else {
                continue;
            };
            parts.push(rewriter.rewrite_wrapped(chunk, ns, &mut diagnostics));
            consumed.push(id.clone());
        }

        let mut script = parts.join("\n");
        if !script.is_empty() {
            script.push('\n');
        }
        let entry_start = script.len();
        if let Some(entry) = build.chunks.get(entry_id) {
            script.push_str(&rewriter.rewrite_body(entry, &mut diagnostics));
        }

        tracing::debug!(
            entry = entry_id,
            wrapped = consumed.len() - 1,
            diagnostics = diagnostics.len(),
            "linked entry chunk"
        );

        LinkOutput {
            script,
            entry_start,
            consumed,
            namespaces,
            diagnostics,
        }
    }
}

/// Link the entry chunk `entry_ref` out of `chunks`.
///
/// Fails only when the entry itself cannot be found; every other problem is
/// reported through [`LinkOutput::diagnostics`].
///
/// ```
/// use inlay_link::{ChunkMap, LinkOptions, link};
///
/// let mut chunks = ChunkMap::new();
/// chunks.insert("index.js".into(), r#"import{y as z}from"./a.js";console.log(z);"#.into());
/// chunks.insert("a.js".into(), "const x=1;export{x as y};".into());
///
/// let output = link(&chunks, "index.js", &LinkOptions::default()).unwrap();
/// assert_eq!(output.consumed, ["index.js", "a.js"]);
/// assert!(output.script.contains("return { y: x };"));
/// assert!(output.script.contains("const { y: z } = __ns_a;"));
/// ```
pub fn link(chunks: &ChunkMap, entry_ref: &str, options: &LinkOptions) -> Result<LinkOutput> {
    Linker::new(chunks, options.clone()).link(entry_ref, None)
}
