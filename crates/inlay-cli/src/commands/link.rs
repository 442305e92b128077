//! Link command implementation.

use std::fs;

use inlay::OutputBundle;
use inlay_link::{LinkOptions, link};

use crate::cli::LinkArgs;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the link command.
///
/// The script goes to stdout (or `--output`); diagnostics go to stderr.
pub fn execute(args: LinkArgs, quiet: bool) -> Result<()> {
    super::ensure_dir(&args.dir)?;

    let chunks = OutputBundle::read_dir(&args.dir)?.chunk_map();
    let mut options = LinkOptions::default();
    if let Some(prefix) = args.namespace_prefix {
        options = options.with_namespace_prefix(prefix);
    }

    let output = link(&chunks, &args.entry, &options)?;
    ui::print_diagnostics(output.diagnostics.iter());

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, format!("{}\n", output.script))
                .context(format!("Failed to write {}", path.display()))?;
            if !quiet {
                ui::status(
                    ui::Status::Done,
                    &format!(
                        "Linked {} chunk(s) into {}",
                        output.consumed.len(),
                        path.display()
                    ),
                );
            }
        }
        None => println!("{}", output.script),
    }
    Ok(())
}
