//! inlay CLI - single-file HTML from a multi-file web build.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`commands`] - `inline` and `link` implementations
//! - [`error`] - Error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - Status messages and summaries on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};

use cli::{Cli, Command};

/// Run a parsed command line: set up logging, then dispatch.
///
/// The inline command loads its configuration first so the config file's
/// log level can take part in logger setup.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inline(args) => {
            let config = commands::inline::load_config(&args)?;
            let configured = commands::inline::configured_log_level(&config)?;
            logger::init_logger(cli.verbose, cli.quiet, cli.no_color, configured);
            commands::inline_execute(args, config, cli.quiet)
        }
        Command::Link(args) => {
            logger::init_logger(cli.verbose, cli.quiet, cli.no_color, None);
            commands::link_execute(args, cli.quiet)
        }
    }
}
