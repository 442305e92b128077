//! Terminal output helpers.
//!
//! Status messages go to stderr so `inlay link` can stream the script on
//! stdout.

mod format;
mod messages;

pub use format::{format_size, print_diagnostics, print_inline_summary};
pub use messages::{Status, print as status};
