#![cfg_attr(docsrs, feature(doc_cfg))]

//! # inlay
//!
//! Folds a multi-file web build into self-contained HTML documents.
//!
//! A bundler writes an HTML page next to JavaScript chunks and stylesheets.
//! `inlay` replaces each `<script src>` with the entry chunk linked together
//! with every chunk it imports (see [`inlay_link`]), each
//! `<link rel="stylesheet">` with a `<style>` element, drops preload hints
//! that became pointless, and deletes the files nothing refers to anymore.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use inlay::Inliner;
//!
//! # fn main() -> Result<(), inlay::Error> {
//! let config = inlay_config::discover(".")?;
//! let report = Inliner::from_config(&config)?.run_dir(Path::new("dist"), None)?;
//!
//! for document in &report.documents {
//!     println!("{}: {} scripts, {} styles", document.name, document.scripts.len(), document.styles.len());
//! }
//! # Ok(()) }
//! ```
//!
//! ## Working in memory
//!
//! ```
//! use inlay::{InlineOptions, Inliner, OutputBundle};
//!
//! # fn main() -> Result<(), inlay::Error> {
//! let mut bundle = OutputBundle::new();
//! bundle.insert_asset("index.html", r#"<link rel="stylesheet" href="site.css">"#);
//! bundle.insert_asset("site.css", "body{margin:0}");
//!
//! Inliner::new(InlineOptions::default())?.run(&mut bundle)?;
//! assert_eq!(bundle.asset_text("index.html"), Some("<style>body{margin:0}</style>"));
//! assert!(!bundle.contains("site.css"));
//! # Ok(()) }
//! ```

pub mod bundle;
pub mod css;
pub mod error;
pub mod html;
pub mod inline;
pub mod loader;

pub use bundle::{OutputBundle, OutputItem};
pub use error::{Error, Result};
pub use inline::{DocumentReport, InlineReport, Inliner};

pub use inlay_config::{InlayConfig, InlineOptions};
pub use inlay_link::{Diagnostic, DiagnosticKind, DiagnosticSeverity, LinkOptions, LinkOutput};

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};
