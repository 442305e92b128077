//! Logging infrastructure for the inlay CLI.
//!
//! Library crates only emit `tracing` events; this module installs the
//! subscriber that prints them.
//!
//! # Example
//!
//! ```rust,no_run
//! use inlay_cli::logger::init_logger;
//!
//! init_logger(false, false, false, None);
//! tracing::info!("Inlining dist");
//! ```

use inlay::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level selected by the global verbosity flags.
///
/// `--verbose` wins over `--quiet`; without either, warnings are shown so
/// link diagnostics reach the terminal.
pub fn level_for(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        LogLevel::Debug
    } else if quiet {
        LogLevel::Error
    } else {
        LogLevel::Warn
    }
}

/// Initialize the tracing subscriber with the specified options.
///
/// The level comes from, in order: `--verbose` / `--quiet`, `RUST_LOG`,
/// `configured` (the config file's `settings.log_level`), then warnings.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, configured: Option<LogLevel>) {
    let filter = if verbose || quiet {
        EnvFilter::new(crate_directives(level_for(verbose, quiet)))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(crate_directives(configured.unwrap_or(LogLevel::Warn)))
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn crate_directives(level: LogLevel) -> String {
    ["inlay", "inlay_link", "inlay_config", "inlay_cli"]
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
