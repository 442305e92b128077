//! One-line status output on stderr.

use owo_colors::OwoColorize;

/// What a status line reports; picks its marker and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A document or script was produced.
    Done,
    /// Nothing changed, or a closing total.
    Note,
    /// Something was left as it was.
    Warning,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Done => "✓",
            Status::Note => "ℹ",
            Status::Warning => "⚠",
        }
    }
}

/// Print a status line to stderr.
pub fn print(status: Status, message: &str) {
    let marker = status.marker();
    match status {
        Status::Done => eprintln!("{} {message}", marker.green().bold()),
        Status::Note => eprintln!("{} {message}", marker.blue().bold()),
        Status::Warning => eprintln!("{} {}", marker.yellow().bold(), message.yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_per_status() {
        assert_eq!(Status::Done.marker(), "✓");
        assert_eq!(Status::Note.marker(), "ℹ");
        assert_eq!(Status::Warning.marker(), "⚠");
    }
}
