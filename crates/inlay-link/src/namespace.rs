//! Synthetic identifiers for wrapped chunks.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Default prefix of allocated namespace identifiers.
pub const DEFAULT_PREFIX: &str = "__ns_";

const MAX_STEM_LEN: usize = 32;
const MIN_HASH_LEN: usize = 6;

/// Chunk id to namespace identifier, in allocation order.
///
/// Identifiers are unique within one map. A base that is already taken gets
/// `_1`, `_2`, ... appended, so allocating the same ids in the same order
/// always gives the same names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    names: IndexMap<String, String>,
    taken: FxHashSet<String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate names for `ids` in order.
    pub fn allocate<'a, I>(ids: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut map = Self::new();
        for id in ids {
            map.insert(id, prefix);
        }
        map
    }

    /// Allocate a name for `id`, or return the one it already has.
    pub fn insert(&mut self, id: &str, prefix: &str) -> &str {
        if !self.names.contains_key(id) {
            let base = base_identifier(id, prefix);
            let mut name = base.clone();
            let mut counter = 1;
            while self.taken.contains(&name) {
                name = format!("{base}_{counter}");
                counter += 1;
            }
            self.taken.insert(name.clone());
            self.names.insert(id.to_string(), name);
        }
        self.names.get(id).map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    /// `(chunk id, identifier)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Derive the identifier a chunk would get before collision handling.
///
/// Bundler file names usually end in a content hash (`index-4f2a1c9b.js`,
/// `vendor.9d8e7f6a.js`). When one is found it becomes the name; otherwise the
/// sanitized file stem is used.
pub fn base_identifier(id: &str, prefix: &str) -> String {
    let file = id.rsplit('/').next().unwrap_or(id);
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };

    let token = hash_token(stem).unwrap_or(stem);
    let mut body: String = token
        .chars()
        .take(MAX_STEM_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if body.is_empty() {
        body.push_str("chunk");
    }

    let mut name = format!("{prefix}{body}");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Trailing `-` or `.` separated token that looks like a content hash.
fn hash_token(stem: &str) -> Option<&str> {
    let (_, token) = stem.rsplit_once(['-', '.'])?;
    let looks_hashed = token.len() >= MIN_HASH_LEN
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && (token.chars().any(|c| c.is_ascii_digit())
            || (token.chars().any(|c| c.is_ascii_lowercase())
                && token.chars().skip(1).any(|c| c.is_ascii_uppercase())));
    looks_hashed.then_some(token)
}
