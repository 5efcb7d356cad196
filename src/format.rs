//! Output format selection.
//!
//! [`OutputFormat`] names the writers in [`crate::core::output`] and picks
//! one from a CLI flag or a file extension, without pulling in the CLI
//! framework.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv", feature = "json"))]
//! # fn example() -> watchpack::Result<()> {
//! use watchpack::format::{OutputFormat, to_format_string};
//! use watchpack::core::models::OutputConfig;
//! use watchpack::Extractor;
//!
//! let listings = Extractor::default().parse("126610LN 2024 new 135k");
//!
//! let format = OutputFormat::from_path("prices.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//!
//! let jsonl = to_format_string(&listings, format, &OutputConfig::new())?;
//! assert_eq!(jsonl.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::models::{ExtractedListing, OutputConfig};
use crate::error::{Result, WatchpackError};

/// Output format for extracted listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Semicolon-delimited CSV, one row per listing (default)
    #[default]
    Csv,

    /// JSON array of listings
    Json,

    /// JSON Lines, one listing per line. Also known as NDJSON.
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// ```rust
    /// use watchpack::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Cargo feature the writer for this format lives behind.
    pub fn feature(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json | OutputFormat::Jsonl => "json",
        }
    }

    /// Detects the format from a file extension (case-insensitive).
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        ext.parse().map_err(|_| {
            WatchpackError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: csv, json, jsonl"),
            )
        })
    }

    fn missing_feature(self) -> WatchpackError {
        WatchpackError::invalid_format(
            "output",
            format!(
                "Output format {self} requires the '{}' feature to be enabled",
                self.feature()
            ),
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{s}'. Expected one of: csv, json, jsonl, ndjson"
            )),
        }
    }
}

/// Writes listings to a file in the given format.
///
/// # Errors
///
/// Returns an error if the writer's feature is disabled or the file cannot
/// be written.
#[allow(unused_variables)]
pub fn write_to_format(
    listings: &[ExtractedListing],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    match format {
        #[cfg(feature = "csv")]
        OutputFormat::Csv => crate::core::output::write_csv(listings, path, config),
        #[cfg(feature = "json")]
        OutputFormat::Json => crate::core::output::write_json(listings, path, config),
        #[cfg(feature = "json")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(listings, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(format.missing_feature()),
    }
}

/// Renders listings to a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(
    listings: &[ExtractedListing],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        #[cfg(feature = "csv")]
        OutputFormat::Csv => crate::core::output::to_csv(listings, config),
        #[cfg(feature = "json")]
        OutputFormat::Json => crate::core::output::to_json(listings, config),
        #[cfg(feature = "json")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(listings, config),
        #[allow(unreachable_patterns)]
        _ => Err(format.missing_feature()),
    }
}
