//! Command implementations for the inlay CLI.
//!
//! - [`inline`] - Inline a build directory
//! - [`link`] - Link one entry chunk

use std::fs;
use std::path::Path;

use crate::error::{CliError, Result, ResultExt};

pub mod inline;
pub mod link;

pub use inline::execute as inline_execute;
pub use link::execute as link_execute;

/// Fail unless `path` is an existing directory.
pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).with_path(path)?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "{} is not a directory",
            path.display()
        )))
    }
}
