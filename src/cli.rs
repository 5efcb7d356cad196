//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure
//! - [`Source`] - Supported input sources
//! - [`OutputFormat`] - Output format options
//!
//! ```rust
//! use watchpack::cli::{Source, OutputFormat};
//! use watchpack::parser::{Platform, create_parser};
//!
//! let parser = create_parser(Platform::from(Source::Plain));
//! assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
//! ```

use std::fmt;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Extract watch listings and buy requests from trading group chats.
#[derive(Parser, Debug, Clone)]
#[command(name = "watchpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    watchpack whatsapp \"WhatsApp Chat with HK Traders.txt\"
    watchpack wa chat.txt -o prices.jsonl -f jsonl
    watchpack wa chat.txt --pid 5711 --prefix --after 2025-01-01
    watchpack wa chat.txt --references catalog.csv --senders -t
    watchpack plain stocklist.txt --currency USD")]
pub struct Args {
    /// Input source type
    #[arg(value_enum)]
    pub source: Source,

    /// Path to input file
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Keep only listings for this reference
    #[arg(long, value_name = "PID")]
    pub pid: Option<String>,

    /// Match --pid as a prefix (5711 matches 5711/1A and 5711/1A-010)
    #[arg(long, requires = "pid")]
    pub prefix: bool,

    /// Keep only listings from this sender
    #[arg(long, value_name = "USER")]
    pub from: Option<String>,

    /// Keep listings on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep listings on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Reference catalog for brand/family/name enrichment (.csv or .json)
    #[arg(long, value_name = "FILE")]
    pub references: Option<String>,

    /// Currency assumed for prices without one
    #[arg(long, value_name = "CUR")]
    pub currency: Option<String>,

    /// Extractor settings as JSON
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Include timestamps in output
    #[arg(short = 't', long)]
    pub timestamps: bool,

    /// Include sender and group in output
    #[arg(long)]
    pub senders: bool,

    /// Keep repeated listings
    #[arg(long)]
    pub no_dedupe: bool,

    /// Log extraction decisions to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Default `--output` value; its extension follows `--format`.
pub const DEFAULT_OUTPUT: &str = "listings.csv";

/// Supported input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// WhatsApp TXT export
    #[value(name = "whatsapp", alias = "wa")]
    #[serde(alias = "wa")]
    WhatsApp,

    /// Text file holding one message
    #[value(alias = "txt", alias = "text")]
    #[serde(alias = "txt", alias = "text")]
    Plain,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::WhatsApp => write!(f, "WhatsApp"),
            Source::Plain => write!(f, "Plain text"),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with semicolon delimiter (default)
    #[default]
    Csv,

    /// JSON array of listings
    Json,

    /// JSON Lines, one listing per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&crate::format::OutputFormat::from(*self), f)
    }
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_full() {
        let args = Args::try_parse_from([
            "watchpack", "wa", "chat.txt", "-f", "jsonl", "--pid", "5711", "--prefix", "--from",
            "Bob", "--after", "2025-01-01", "--currency", "usd", "-t", "--senders", "--no-dedupe",
        ])
        .unwrap();

        assert_eq!(args.source, Source::WhatsApp);
        assert_eq!(args.format, OutputFormat::Jsonl);
        assert_eq!(args.output, DEFAULT_OUTPUT);
        assert_eq!(args.pid.as_deref(), Some("5711"));
        assert!(args.prefix && args.timestamps && args.senders && args.no_dedupe);
        assert_eq!(args.currency.as_deref(), Some("usd"));
    }

    #[test]
    fn test_prefix_requires_pid() {
        assert!(Args::try_parse_from(["watchpack", "plain", "a.txt", "--prefix"]).is_err());
    }

    #[test]
    fn test_source_display_and_serde() {
        assert_eq!(Source::WhatsApp.to_string(), "WhatsApp");
        let parsed: Source = serde_json::from_str("\"txt\"").unwrap();
        assert_eq!(parsed, Source::Plain);
    }

    #[test]
    fn test_format_conversion() {
        let lib: crate::format::OutputFormat = OutputFormat::Jsonl.into();
        assert_eq!(lib.extension(), "jsonl");
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
    }
}
