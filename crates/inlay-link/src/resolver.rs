//! Module reference to chunk id resolution.
//!
//! References are resolved against the importer's directory first; when that
//! path names no chunk, the reference's final path segment is matched against
//! chunk file names. Bundler output places sibling chunks side by side, so the
//! basename fallback covers custom public base paths as well.

use std::path::Path;

use path_clean::PathClean;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::chunk::ChunkMap;
use crate::error::{LinkError, Result};

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub id: &'a str,
    /// True when the match came from the basename fallback.
    pub by_basename: bool,
    /// Number of chunks that matched; above one the first in dictionary order wins.
    pub candidates: usize,
}

impl Resolved<'_> {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}

/// Resolves references against a fixed set of chunk ids.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    exact: FxHashSet<&'a str>,
    by_basename: FxHashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Resolver<'a> {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut exact = FxHashSet::default();
        let mut by_basename: FxHashMap<&'a str, Vec<&'a str>> = FxHashMap::default();
        for id in ids {
            if exact.insert(id) {
                by_basename.entry(basename(id)).or_default().push(id);
            }
        }
        Self { exact, by_basename }
    }

    pub fn from_chunks(chunks: &'a ChunkMap) -> Self {
        Self::new(chunks.keys().map(String::as_str))
    }

    /// Resolve `reference` as written in `importer` (a chunk id or document name).
    pub fn resolve(&self, reference: &str, importer: Option<&str>) -> Result<Resolved<'a>> {
        let trimmed = strip_query(reference);
        if is_non_local(trimmed) {
            return Err(LinkError::NonLocalReference {
                reference: reference.to_string(),
            });
        }

        let base = basename(trimmed);
        if base.is_empty() {
            return Err(LinkError::UnresolvedReference {
                reference: reference.to_string(),
            });
        }

        let normalized = normalize(trimmed, importer);
        if let Some(id) = self.exact.get(normalized.as_str()) {
            return Ok(Resolved {
                id,
                by_basename: false,
                candidates: 1,
            });
        }

        match self.by_basename.get(base).and_then(|c| c.first().map(|id| (*id, c.len()))) {
            Some((id, candidates)) => Ok(Resolved {
                id,
                by_basename: true,
                candidates,
            }),
            None => Err(LinkError::UnresolvedReference {
                reference: reference.to_string(),
            }),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.exact.contains(id)
    }
}

fn strip_query(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    reference[..end].trim()
}

/// URLs (`https://...`, `data:...`) and protocol-relative references never name a chunk.
pub fn is_non_local(reference: &str) -> bool {
    if reference.starts_with("//") {
        return true;
    }
    match reference.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn normalize(reference: &str, importer: Option<&str>) -> String {
    let joined = if let Some(rooted) = reference.strip_prefix('/') {
        rooted.to_string()
    } else {
        match importer.and_then(|i| i.rsplit_once('/')) {
            Some((dir, _)) => format!("{dir}/{reference}"),
            None => reference.to_string(),
        }
    };

    Path::new(&joined)
        .clean()
        .to_string_lossy()
        .replace('\\', "/")
}
