//! Command-line interface definition for inlay.
//!
//! # Command Structure
//!
//! - `inlay inline` - Inline scripts and stylesheets of a build into its HTML
//! - `inlay link` - Link one entry chunk into a flat script

mod commands;
mod tests;
mod validation;

use clap::Parser;

pub use commands::{Command, InlineArgs, LinkArgs};
pub use validation::parse_namespace_prefix;

/// inlay - single-file HTML from a multi-file web build
#[derive(Parser, Debug)]
#[command(
    name = "inlay",
    version,
    about = "Fold a multi-file web build into self-contained HTML",
    long_about = "inlay replaces the <script src> and <link rel=\"stylesheet\"> tags of a build's\n\
                  HTML documents with their content. ES module chunks are linked into one flat\n\
                  script per entry, so the page works without a module loader or extra requests."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
