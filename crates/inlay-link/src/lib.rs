//! # inlay-link
//!
//! Folds ES module chunks into one flat script.
//!
//! A bundler emits chunks that still reference each other through static
//! `import` / `export` statements. Inlining them into a single HTML document
//! means those references have to be resolved ahead of time: every chunk the
//! entry depends on becomes an eagerly evaluated closure bound to a synthetic
//! identifier, and every import becomes a destructuring of that identifier.
//!
//! ## Pipeline
//!
//! ```text
//!   ChunkMap + entry ref
//!          │
//!          ▼
//!   ┌──────────────┐   specifier::scan      ┌──────────┐
//!   │ graph::build │ ─────────────────────▶ │ Resolver │
//!   └──────┬───────┘                        └──────────┘
//!          ▼
//!   sequence (three-color DFS, back-edges skipped)
//!          ▼
//!   NamespaceMap::allocate (entry excluded)
//!          ▼
//!   Rewriter (imports -> destructuring, exports -> return object)
//!          ▼
//!   wrappers in order + entry body  ──▶  LinkOutput
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use inlay_link::{ChunkMap, LinkOptions, link};
//!
//! # fn main() -> Result<(), inlay_link::LinkError> {
//! let mut chunks = ChunkMap::new();
//! chunks.insert(
//!     "assets/index-4f2a1c9b.js".into(),
//!     r#"import{r as render}from"./vendor-9d8e7f6a.js";render();"#.into(),
//! );
//! chunks.insert(
//!     "assets/vendor-9d8e7f6a.js".into(),
//!     "function r(){}export{r};".into(),
//! );
//!
//! let output = link(&chunks, "assets/index-4f2a1c9b.js", &LinkOptions::default())?;
//! assert_eq!(
//!     output.script,
//!     "const __ns_9d8e7f6a = (() => {\nfunction r(){}\nreturn { r: r };\n})();\n\
//!      const { r: render } = __ns_9d8e7f6a;render();"
//! );
//! assert_eq!(output.consumed.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! - Bindings are copied out of a namespace once; later mutation in the
//!   exporting chunk is not observed.
//! - Chunks on an import cycle run in depth-first post-order. Cycles are
//!   reported as `circular_dependency` warnings.
//! - Re-exports are followed one hop.
//! - Statement recognition is pattern based and meant for bundler output.

pub mod assemble;
pub mod chunk;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod namespace;
pub mod resolver;
pub mod rewrite;
pub mod sequence;
pub mod specifier;

pub use assemble::{LinkOptions, LinkOutput, Linker, link};
pub use chunk::{Chunk, ChunkMap, ExportSpecifier, ImportBinding, ImportSpecifier};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};
pub use error::{LinkError, Result};
pub use graph::{DependencyGraph, GraphBuild};
pub use namespace::{DEFAULT_PREFIX, NamespaceMap};
pub use resolver::{Resolved, Resolver, is_non_local};
pub use sequence::{Sequence, sequence};
pub use specifier::{Binding, Segment, SegmentKind, Statement};
