//! Inline command implementation.

use std::fs;
use std::path::Path;

use inlay::{InlayConfig, Inliner, LogLevel};
use inlay_config::{ConfigDiscovery, discovery::load_file, validate_schema};

use crate::cli::InlineArgs;
use crate::error::{CliError, Result};
use crate::ui;

/// Load the configuration for `args`: the `--config` file or the one
/// discovered in the current directory, then the profile, then the flags.
pub fn load_config(args: &InlineArgs) -> Result<InlayConfig> {
    let base = match &args.config {
        Some(path) => load_file(path)?,
        None => ConfigDiscovery::new(std::env::current_dir()?).load_or_default()?,
    };
    let mut config = base.materialize_profile(args.profile.as_deref())?;

    let inline = &mut config.inline;
    if !args.patterns.is_empty() {
        inline.inline_pattern = args.patterns.clone();
    }
    if args.keep_inlined {
        inline.delete_inlined_files = false;
    }
    if args.remove_module_loader {
        inline.remove_module_loader = true;
    }
    if args.cdata {
        inline.cdata = true;
    }
    if args.no_strip_css_comments {
        inline.strip_css_comments = false;
    }

    validate_schema(&config)?;
    Ok(config)
}

/// The config file's `settings.log_level`, if set.
pub fn configured_log_level(config: &InlayConfig) -> Result<Option<LogLevel>> {
    config
        .settings
        .log_level
        .as_deref()
        .map(|level| level.parse::<LogLevel>().map_err(CliError::InvalidArgument))
        .transpose()
}

/// Execute the inline command with an already loaded configuration.
///
/// Link warnings are printed but never fail the command.
pub fn execute(args: InlineArgs, config: InlayConfig, quiet: bool) -> Result<()> {
    super::ensure_dir(&args.dir)?;

    tracing::debug!(dir = %args.dir.display(), "inlining build");
    let inliner = Inliner::from_config(&config)?;
    let report = inliner.run_dir(&args.dir, args.out_dir.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    let target = args.out_dir.as_deref().unwrap_or(&args.dir);
    let html_size = report
        .documents
        .iter()
        .map(|document| document_size(target, &document.name))
        .sum::<Result<u64>>()?;
    ui::print_inline_summary(&report, html_size);
    Ok(())
}

fn document_size(dir: &Path, name: &str) -> Result<u64> {
    Ok(fs::metadata(dir.join(name))?.len())
}
