//! Miette diagnostic conversion for CLI errors.

use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => match e.hint() {
            Some(hint) => miette::miette!(help = hint.to_string(), "Configuration error: {}", e),
            None => miette::miette!("Configuration error: {}", e),
        },
        CliError::Inline(inlay::Error::Config(e)) => cli_error_to_miette(CliError::Config(e)),
        CliError::Link(e) => miette::miette!(
            help = "ENTRY is matched against file names relative to DIR",
            "{}",
            e
        ),
        CliError::DirectoryNotFound(path) => miette::miette!(
            help = "Point inlay at the output directory of your bundler, e.g. dist",
            "Directory not found: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_hint_becomes_help() {
        let err = CliError::Config(inlay_config::ConfigError::SchemaValidation {
            message: "bad".to_string(),
            hint: Some("fix it".to_string()),
        });
        let report = cli_error_to_miette(err);
        assert_eq!(report.help().map(|h| h.to_string()).as_deref(), Some("fix it"));
        assert!(report.to_string().contains("schema validation failed: bad"));
    }
}
