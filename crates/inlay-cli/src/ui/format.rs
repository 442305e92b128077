//! Formatting of sizes and run summaries.

use inlay::{Diagnostic, InlineReport};
use owo_colors::OwoColorize;

use super::messages::{self, Status};

/// Format file size in human-readable format.
///
/// ```
/// use inlay_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Print every warning diagnostic, with its help line.
pub fn print_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    for diagnostic in diagnostics.into_iter().filter(|d| d.is_warning()) {
        let location = diagnostic
            .chunk
            .as_deref()
            .map(|chunk| format!(" ({chunk})"))
            .unwrap_or_default();
        messages::print(Status::Warning, &format!(
            "[{}] {}{}",
            diagnostic.kind.as_str(),
            diagnostic.message,
            location
        ));
        if let Some(help) = &diagnostic.help {
            eprintln!("  {} {}", "help:".dimmed(), help);
        }
    }
}

/// Print one line per document, a warning count and a closing total.
pub fn print_inline_summary(report: &InlineReport, output_size: u64) {
    for document in &report.documents {
        if document.scripts.is_empty() && document.styles.is_empty() {
            let line = format!("{} {}", document.name, "(nothing to inline)".dimmed());
            messages::print(Status::Note, &line);
            continue;
        }
        messages::print(Status::Done, &format!(
            "{} {}",
            document.name.bold(),
            format!(
                "{} script(s), {} stylesheet(s)",
                document.scripts.len(),
                document.styles.len()
            )
            .dimmed()
        ));
    }

    // Warnings were already logged by the inliner as they were found.
    let warnings = report.warnings().count();
    if warnings > 0 {
        messages::print(Status::Warning, &format!("{warnings} warning(s)"));
    }

    messages::print(Status::Note, &format!(
        "Inlined {} script(s) and {} stylesheet(s) into {} document(s), deleted {} file(s), {} of HTML",
        report.inlined_scripts(),
        report.inlined_styles(),
        report.documents.len(),
        report.deleted.len(),
        format_size(output_size)
    ));
}
