//! Chunk dependency graph built from an entry chunk.

use indexmap::{IndexMap, IndexSet};

use crate::chunk::{Chunk, ChunkMap};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::LinkError;
use crate::resolver::Resolver;

/// Adjacency list of static chunk-to-chunk imports, keyed by chunk id.
///
/// The entry chunk is never a key. Its direct import targets are kept as the
/// ordered seed set instead. Every key was observed as the import target of
/// some other node, and both seeds and edges keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    entry: String,
    seeds: IndexSet<String>,
    edges: IndexMap<String, IndexSet<String>>,
}

/// Result of walking an entry chunk.
#[derive(Debug, Clone)]
pub struct GraphBuild {
    pub graph: DependencyGraph,
    /// Parsed chunks: the entry first, then every node in discovery order.
    pub chunks: IndexMap<String, Chunk>,
}

impl DependencyGraph {
    /// Assemble a graph from already known parts.
    pub fn from_parts(
        entry: impl Into<String>,
        seeds: IndexSet<String>,
        edges: IndexMap<String, IndexSet<String>>,
    ) -> Self {
        Self {
            entry: entry.into(),
            seeds,
            edges,
        }
    }

    /// Walk `entry_id` depth-first, parsing and resolving every reachable chunk.
    ///
    /// References that do not resolve are reported and produce no edge.
    /// References back to the entry chunk or to the importing chunk itself
    /// produce no edge either.
    pub fn build(
        chunks: &ChunkMap,
        entry_id: &str,
        resolver: &Resolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> GraphBuild {
        let mut parsed = IndexMap::new();
        let entry_code = chunks.get(entry_id).map(String::as_str).unwrap_or_default();
        let mut entry = Chunk::parse(entry_id, entry_code);
        let seeds = resolve_sources(&mut entry, entry_id, resolver, diagnostics);
        parsed.insert(entry.id.clone(), entry);

        let mut edges: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut stack: Vec<String> = seeds.iter().rev().cloned().collect();

        while let Some(id) = stack.pop() {
            if edges.contains_key(&id) {
                continue;
            }
            let Some(code) = chunks.get(&id) else {
                continue;
            };

            let mut chunk = Chunk::parse(id.clone(), code.as_str());
            let targets = resolve_sources(&mut chunk, entry_id, resolver, diagnostics);
            stack.extend(
                targets
                    .iter()
                    .rev()
                    .filter(|target| !edges.contains_key(*target))
                    .cloned(),
            );
            edges.insert(id.clone(), targets);
            parsed.insert(id, chunk);
        }

        tracing::debug!(
            entry = entry_id,
            nodes = edges.len(),
            "built chunk dependency graph"
        );

        GraphBuild {
            graph: Self {
                entry: entry_id.to_string(),
                seeds,
                edges,
            },
            chunks: parsed,
        }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Direct import targets of the entry chunk.
    pub fn seeds(&self) -> impl Iterator<Item = &str> {
        self.seeds.iter().map(String::as_str)
    }

    /// Direct import targets of `id`, in discovery order.
    pub fn dependencies(&self, id: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(id)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// The `index`-th dependency of `id`, if there is one.
    pub fn dependency_at(&self, id: &str, index: usize) -> Option<&str> {
        self.edges
            .get(id)
            .and_then(|targets| targets.get_index(index))
            .map(String::as_str)
    }

    /// Every node (entry excluded) in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(IndexSet::len).sum()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Resolve every distinct source of `chunk`, recording resolutions on the
/// chunk and returning the targets that become edges.
fn resolve_sources(
    chunk: &mut Chunk,
    entry_id: &str,
    resolver: &Resolver<'_>,
    diagnostics: &mut Diagnostics,
) -> IndexSet<String> {
    let mut targets = IndexSet::new();
    let sources: Vec<String> = chunk.sources().into_iter().map(str::to_string).collect();

    for source in sources {
        let resolved = match resolver.resolve(&source, Some(chunk.id.as_str())) {
            Ok(resolved) => resolved,
            Err(LinkError::NonLocalReference { .. }) => {
                diagnostics.push(
                    Diagnostic::info(
                        DiagnosticKind::UnresolvedImport,
                        format!("'{source}' is not a local chunk and stays an import"),
                    )
                    .in_chunk(&chunk.id)
                    .with_reference(&source),
                );
                continue;
            }
            Err(err) => {
                diagnostics.push(
                    Diagnostic::warning(DiagnosticKind::UnresolvedImport, err.to_string())
                        .in_chunk(&chunk.id)
                        .with_reference(&source)
                        .with_help("the statement is left untouched and its bindings stay unset"),
                );
                continue;
            }
        };

        if resolved.is_ambiguous() {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::AmbiguousImport,
                    format!(
                        "'{source}' matches {} chunks by file name, using {}",
                        resolved.candidates, resolved.id
                    ),
                )
                .in_chunk(&chunk.id)
                .with_reference(&source),
            );
        }

        if resolved.id == entry_id {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::EntryImported,
                    format!("'{source}' refers to the entry chunk, which is never wrapped"),
                )
                .in_chunk(&chunk.id)
                .with_reference(&source),
            );
            continue;
        }
        if resolved.id == chunk.id {
            continue;
        }

        chunk
            .resolved
            .insert(source.clone(), resolved.id.to_string());
        targets.insert(resolved.id.to_string());
    }

    targets
}
