//! Error types for avsearch.
//!
//! Library crates use [`AvSearchError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all avsearch operations.
#[derive(Debug, thiserror::Error)]
pub enum AvSearchError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The search backend rejected or failed a request.
    #[error("backend error: {0}")]
    Backend(String),

    /// Transport-level failure talking to the backend.
    #[error("network error: {0}")]
    Network(String),

    /// An enricher failed while decorating a document.
    #[error("enrichment error in {enricher}: {message}")]
    Enrichment { enricher: String, message: String },

    /// Malformed backend response or document content.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid input supplied by a caller.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AvSearchError>;

impl AvSearchError {
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

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an enrichment error attributed to the named enricher.
    pub fn enrichment(enricher: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Enrichment {
            enricher: enricher.into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = AvSearchError::config("missing endpoint");
        assert_eq!(err.to_string(), "config error: missing endpoint");

        let err = AvSearchError::enrichment("images", "bad markup");
        assert_eq!(err.to_string(), "enrichment error in images: bad markup");

        let err = AvSearchError::Backend("HTTP 503".into());
        assert!(err.to_string().contains("503"));
    }
}
