//! Inlining options.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default prefix for namespace identifiers of wrapped chunks.
pub use inlay_link::DEFAULT_PREFIX as DEFAULT_NAMESPACE_PREFIX;

fn default_true() -> bool {
    true
}

fn default_namespace_prefix() -> String {
    DEFAULT_NAMESPACE_PREFIX.to_string()
}

/// How HTML documents of a build are inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineOptions {
    /// Glob patterns of script and stylesheet files to inline. Empty means all.
    #[serde(default)]
    pub inline_pattern: Vec<String>,

    /// Remove inlined files from the output once nothing references them.
    #[serde(default = "default_true")]
    pub delete_inlined_files: bool,

    /// Strip the module-preload polyfill bundlers inject into entry chunks.
    #[serde(default)]
    pub remove_module_loader: bool,

    /// Remove `/* ... */` comments from inlined CSS.
    #[serde(default = "default_true")]
    pub strip_css_comments: bool,

    /// Wrap inlined scripts in `//<![CDATA[ ... //]]>` for XHTML consumers.
    #[serde(default)]
    pub cdata: bool,

    /// Prefix of the identifiers wrapped chunks are bound to.
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            inline_pattern: Vec::new(),
            delete_inlined_files: true,
            remove_module_loader: false,
            strip_css_comments: true,
            cdata: false,
            namespace_prefix: default_namespace_prefix(),
        }
    }
}

impl InlineOptions {
    /// Compile `inline_pattern` into a matcher.
    pub fn matcher(&self) -> Result<InlineMatcher> {
        InlineMatcher::new(&self.inline_pattern)
    }
}

/// Decides which files may be inlined.
#[derive(Debug, Clone, Default)]
pub struct InlineMatcher {
    set: Option<GlobSet>,
}

impl InlineMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self { set: None });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|err| ConfigError::SchemaValidation {
                message: format!("invalid inline pattern '{pattern}': {err}"),
                hint: Some("Use glob syntax such as 'assets/*.js' or '**/*.css'".to_string()),
            })?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|err| ConfigError::SchemaValidation {
                message: format!("invalid inline patterns: {err}"),
                hint: None,
            })?;
        Ok(Self { set: Some(set) })
    }

    /// True when `name` (a `/`-separated path relative to the output root) may be inlined.
    pub fn is_match(&self, name: &str) -> bool {
        match &self.set {
            None => true,
            Some(set) => set.is_match(name),
        }
    }

    pub fn matches_everything(&self) -> bool {
        self.set.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patterns_match_everything() {
        let matcher = InlineOptions::default().matcher().unwrap();
        assert!(matcher.matches_everything());
        assert!(matcher.is_match("assets/index.js"));
    }

    #[test]
    fn patterns_restrict_matches() {
        let options = InlineOptions {
            inline_pattern: vec!["assets/*.js".to_string(), "**/*.css".to_string()],
            ..InlineOptions::default()
        };
        let matcher = options.matcher().unwrap();
        assert!(matcher.is_match("assets/index-4f2a1c9b.js"));
        assert!(matcher.is_match("styles/main.css"));
        assert!(!matcher.is_match("vendor/big.js"));
    }

    #[test]
    fn default_prefix_matches_the_linker() {
        assert_eq!(
            InlineOptions::default().namespace_prefix,
            inlay_link::LinkOptions::default().namespace_prefix
        );
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = InlineMatcher::new(&["assets/[".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
        assert!(err.hint().is_some());
    }
}
