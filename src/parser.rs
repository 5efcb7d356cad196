//! Unified parser trait for chat exports.
//!
//! Every input source turns a file or a string into
//! [`RawMessage`](crate::RawMessage)s ready for the extractor.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "whatsapp")]
//! # fn main() -> watchpack::Result<()> {
//! use watchpack::parser::{Platform, create_parser};
//! use watchpack::Extractor;
//! use std::path::Path;
//!
//! let parser = create_parser(Platform::WhatsApp);
//! let messages = parser.parse(Path::new("WhatsApp Chat with HK Traders.txt"))?;
//!
//! let extractor = Extractor::default();
//! for message in &messages {
//!     for listing in extractor.parse_message(message) {
//!         println!("{} {:?}", listing.pid, listing.price);
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "whatsapp"))]
//! # fn main() {}
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::RawMessage;

/// Supported input sources.
///
/// ```rust
/// use watchpack::parser::Platform;
///
/// assert_eq!("wa".parse::<Platform>().unwrap(), Platform::WhatsApp);
/// assert_eq!("txt".parse::<Platform>().unwrap(), Platform::Plain);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// WhatsApp TXT exports (iOS and Android)
    #[serde(alias = "wa")]
    WhatsApp,

    /// A text file holding one message
    #[serde(alias = "txt", alias = "text")]
    Plain,
}

impl Platform {
    /// Returns the default file extension for this input.
    pub fn default_extension(&self) -> &'static str {
        "txt"
    }

    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["whatsapp", "wa", "plain", "txt", "text"]
    }

    /// Returns all available platforms.
    pub fn all() -> &'static [Platform] {
        &[Platform::WhatsApp, Platform::Plain]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Plain => write!(f, "Plain text"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "plain" | "txt" | "text" => Ok(Platform::Plain),
            _ => Err(format!(
                "Unknown platform: '{}'. Expected one of: {}",
                s,
                Platform::all_names().join(", ")
            )),
        }
    }
}

#[cfg(feature = "cli")]
impl From<crate::cli::Source> for Platform {
    fn from(source: crate::cli::Source) -> Self {
        match source {
            crate::cli::Source::WhatsApp => Platform::WhatsApp,
            crate::cli::Source::Plain => Platform::Plain,
        }
    }
}

/// Reads messages from an input source.
///
/// Parsers must implement:
/// - [`name`](Parser::name) - Parser identifier
/// - [`platform`](Parser::platform) - Platform this parser handles
/// - [`parse`](Parser::parse) - Read a file; may add file-derived metadata
/// - [`parse_str`](Parser::parse_str) - Parse content already in memory
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the platform this parser handles.
    fn platform(&self) -> Platform;

    /// Parses an export file.
    ///
    /// # Errors
    ///
    /// Returns [`WatchpackError`](crate::WatchpackError) if:
    /// - File cannot be read ([`Io`](crate::WatchpackError::Io))
    /// - Content cannot be parsed ([`Parse`](crate::WatchpackError::Parse))
    fn parse(&self, path: &Path) -> Result<Vec<RawMessage>>;

    /// Parses export content from a string.
    fn parse_str(&self, content: &str) -> Result<Vec<RawMessage>>;

    /// Parses an export file (convenience method accepting &str path).
    fn parse_file(&self, path: &str) -> Result<Vec<RawMessage>> {
        self.parse(Path::new(path))
    }
}

/// Creates a parser for the given platform.
///
/// ```rust
/// use watchpack::parser::{Platform, create_parser};
///
/// let parser = create_parser(Platform::Plain);
/// assert_eq!(parser.name(), "Plain text");
/// ```
///
/// # Panics
///
/// Panics if the corresponding parser feature is not enabled.
pub fn create_parser(platform: Platform) -> Box<dyn Parser> {
    match platform {
        #[cfg(feature = "whatsapp")]
        Platform::WhatsApp => Box::new(crate::parsers::WhatsAppParser::new()),
        Platform::Plain => Box::new(crate::parsers::PlainTextParser::new()),
        #[allow(unreachable_patterns)]
        _ => panic!(
            "Parser for {:?} is not enabled. Enable the corresponding feature.",
            platform
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!(Platform::from_str("whatsapp").unwrap(), Platform::WhatsApp);
        assert_eq!(Platform::from_str("WA").unwrap(), Platform::WhatsApp);
        assert_eq!(Platform::from_str("plain").unwrap(), Platform::Plain);
        assert_eq!(Platform::from_str("text").unwrap(), Platform::Plain);
        assert!(Platform::from_str("telegram").is_err());
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::WhatsApp.to_string(), "WhatsApp");
        assert_eq!(Platform::Plain.to_string(), "Plain text");
        assert_eq!(Platform::all().len(), 2);
    }

    #[test]
    fn test_platform_serde_alias() {
        let parsed: Platform = serde_json::from_str("\"wa\"").unwrap();
        assert_eq!(parsed, Platform::WhatsApp);
        assert_eq!(serde_json::to_string(&Platform::Plain).unwrap(), "\"plain\"");
    }

    #[test]
    fn test_create_parser() {
        let parser = create_parser(Platform::Plain);
        assert_eq!(parser.platform(), Platform::Plain);
        let messages = parser.parse_str("126610LN 135k").unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[cfg(feature = "whatsapp")]
    #[test]
    fn test_create_whatsapp_parser() {
        let parser = create_parser(Platform::WhatsApp);
        assert_eq!(parser.name(), "WhatsApp");
    }
}
