//! Error types for notion-sync.
//!
//! Library crates use [`NotionSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all notion-sync operations.
#[derive(Debug, thiserror::Error)]
pub enum NotionSyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// One or more required environment variables are unset or empty.
    #[error("missing required environment variables: {}", names.join(", "))]
    MissingEnv { names: Vec<String> },

    /// Transport-level failure talking to the Notion API.
    #[error("network error: {0}")]
    Network(String),

    /// The Notion API answered with a non-success status.
    #[error("Notion API returned HTTP {status} for {endpoint}:\n{body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response payload could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NotionSyncError>;

impl NotionSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
