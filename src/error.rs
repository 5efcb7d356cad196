//! Unified error types for watchpack.
//!
//! This module provides a single [`WatchpackError`] enum that covers every
//! fallible operation in the library: reading chat exports, loading reference
//! catalogs and configuration, and writing output files.
//!
//! Extraction itself never fails. A message that yields nothing usable simply
//! produces no records; see [`crate::extract`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for watchpack operations.
///
/// # Example
///
/// ```rust
/// use watchpack::error::Result;
/// use watchpack::RawMessage;
///
/// fn load() -> Result<Vec<RawMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, WatchpackError>;

/// The error type for all watchpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatchpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse an input file.
    #[error("Failed to parse {format} input{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "WhatsApp TXT", "reference CSV")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date format in filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// Extractor configuration failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Which setting is wrong and why
        message: String,
    },

    /// The reference catalog could not be fetched.
    ///
    /// Raised by [`ReferenceSource`](crate::reference::ReferenceSource)
    /// implementations. The cache logs it and keeps serving the previous
    /// snapshot; parsing is never aborted by it.
    #[error("Reference source '{source_name}' unavailable: {message}")]
    Reference {
        /// Name of the source that failed
        source_name: String,
        /// Description of the failure
        message: String,
    },

    /// CSV reading or writing error.
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[cfg(feature = "json")]
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Regex/pattern matching error
    #[error("{0}")]
    Pattern(String),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

impl From<std::string::FromUtf8Error> for WatchpackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        WatchpackError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl WatchpackError {
    /// Creates a parse error for the WhatsApp export format.
    pub fn whatsapp_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        WatchpackError::Parse {
            format: "WhatsApp TXT",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates a parse error for a reference catalog file.
    pub fn reference_parse(
        format: &'static str,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        WatchpackError::Parse {
            format,
            source: ParseErrorKind::Other(message.into()),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        WatchpackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        WatchpackError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        WatchpackError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a reference-source failure.
    pub fn reference_unavailable(
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        WatchpackError::Reference {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, WatchpackError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, WatchpackError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, WatchpackError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, WatchpackError::InvalidConfig { .. })
    }

    /// Returns `true` if the reference source failed.
    pub fn is_reference(&self) -> bool {
        matches!(self, WatchpackError::Reference { .. })
    }
}
