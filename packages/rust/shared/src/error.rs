//! Error types for SkillPress.
//!
//! Library crates use [`SkillPressError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SkillPress operations.
#[derive(Debug, thiserror::Error)]
pub enum SkillPressError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error during sitemap or page retrieval.
    #[error("network error: {0}")]
    Network(String),

    /// Sitemap XML or document parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Bundle assembly error (malformed skill tree, bad dist state).
    #[error("bundle error: {0}")]
    Bundle(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SkillPressError>;

impl SkillPressError {
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
