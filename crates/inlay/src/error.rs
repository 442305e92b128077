//! Error types for the inliner.

use thiserror::Error;

/// Result type alias for inlay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop an inline run.
///
/// Problems with individual documents or chunks are not errors; they are
/// collected as diagnostics in the [`InlineReport`](crate::InlineReport).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration provided.
    #[error(transparent)]
    Config(#[from] inlay_config::ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// Walking the build directory failed.
    #[error("Failed to read build directory: {0}")]
    ReadDir(#[from] walkdir::Error),

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl Error {
    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoError {
            message: message.into(),
            source,
        }
    }
}
