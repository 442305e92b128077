//! inlay CLI entry point: parse arguments, run, report errors with miette.

use clap::Parser;
use inlay_cli::{cli, error};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    inlay_cli::run(args).map_err(error::cli_error_to_miette)
}
