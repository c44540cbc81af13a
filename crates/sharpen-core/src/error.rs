//! Error types for the outer shell of sharpen
//!
//! Syntax problems in C# source are never errors here: they are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s next to a complete tree.
//! `SharpenError` only covers I/O, configuration and cancellation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sharpen operations
#[derive(Debug, Error)]
pub enum SharpenError {
    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A language version string that does not name a known C# edition
    #[error("Invalid language version '{value}'. Expected a version such as '7.3', '12', 'latest' or 'preview'")]
    InvalidLanguageVersion { value: String },

    /// The caller-supplied cancellation check tripped during a parse
    #[error("Parse was cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Config,
    LanguageVersion,
    Cancelled,
    Internal,
}

impl SharpenError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SharpenError::IoError { .. } => ErrorKind::Io,
            SharpenError::ConfigError { .. } => ErrorKind::Config,
            SharpenError::InvalidLanguageVersion { .. } => ErrorKind::LanguageVersion,
            SharpenError::Cancelled => ErrorKind::Cancelled,
            SharpenError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_language_version(value: impl Into<String>) -> Self {
        Self::InvalidLanguageVersion {
            value: value.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for SharpenError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SharpenError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            SharpenError::config_error("bad").kind(),
            ErrorKind::Config
        );
        assert_eq!(
            SharpenError::invalid_language_version("99").kind(),
            ErrorKind::LanguageVersion
        );
    }

    #[test]
    fn test_only_io_is_recoverable() {
        let io = SharpenError::io_error(
            "missing.cs",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(io.is_recoverable());
        assert!(!SharpenError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = SharpenError::invalid_language_version("7.9");
        assert!(err.to_string().contains("'7.9'"));
    }
}
