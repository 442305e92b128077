use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::validation::parse_namespace_prefix;

/// Available inlay subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inline a build directory
    ///
    /// Every HTML document in DIR gets its local scripts and stylesheets
    /// inlined. Files that end up unreferenced are deleted.
    Inline(InlineArgs),

    /// Link one entry chunk
    ///
    /// Resolves the static imports of ENTRY against the JavaScript files in
    /// DIR and prints a single script without module syntax.
    Link(LinkArgs),
}

/// Arguments for the inline command
#[derive(Args, Debug, Clone)]
pub struct InlineArgs {
    /// Build output directory
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Write the result here instead of rewriting DIR in place
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Config file (defaults to inlay.toml or package.json in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Config profile to apply
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Only inline files matching this glob (repeatable)
    #[arg(long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Keep inlined files in the output
    #[arg(long)]
    pub keep_inlined: bool,

    /// Strip the module preload polyfill from entry scripts
    #[arg(long)]
    pub remove_module_loader: bool,

    /// Wrap inlined scripts in CDATA sections
    #[arg(long)]
    pub cdata: bool,

    /// Keep comments in inlined stylesheets
    #[arg(long)]
    pub no_strip_css_comments: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the link command
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Directory holding the chunks
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Entry chunk, relative to DIR
    #[arg(value_name = "ENTRY")]
    pub entry: String,

    /// Write the script to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Prefix of namespace identifiers
    #[arg(long, value_name = "PREFIX", value_parser = parse_namespace_prefix)]
    pub namespace_prefix: Option<String>,
}
