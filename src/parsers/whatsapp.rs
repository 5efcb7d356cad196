//! WhatsApp TXT export parser.
//!
//! WhatsApp exports vary by phone platform and locale. This parser
//! auto-detects the format from the first 20 lines of the file.
//!
//! Supported formats:
//! - iOS US: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - Android US: `1/15/24, 10:30 AM - Sender: Message`
//! - EU: `[15.01.24, 10:30:45] Sender: Message`
//! - EU2: `15/01/2024, 10:30 - Sender: Message`
//! - RU: `15.01.2024, 10:30 - Sender: Message`

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::WhatsAppConfig;
use crate::error::{Result, WatchpackError};
use crate::message::RawMessage;
use crate::parser::{Parser, Platform};
use crate::parsing::whatsapp::{
    DETECTION_SAMPLE, detect_whatsapp_format, group_name_from_stem, has_timestamp_prefix,
    is_whatsapp_system_message, parse_whatsapp_timestamp, strip_direction_marks,
};

/// Parser for WhatsApp TXT exports.
///
/// Multi-line messages are kept together, which is how dealers post stock
/// lists. System notices are skipped unless configured otherwise.
///
/// # Example
///
/// ```rust,no_run
/// use watchpack::parsers::WhatsAppParser;
/// use watchpack::parser::Parser;
///
/// let parser = WhatsAppParser::new();
/// let messages = parser.parse("WhatsApp Chat with HK Traders.txt".as_ref())?;
/// // messages[0].group() == Some("HK Traders")
/// # Ok::<(), watchpack::WatchpackError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhatsAppParser {
    config: WhatsAppConfig,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    fn parse_content(&self, content: &str) -> Result<Vec<RawMessage>> {
        let content = content.trim_start_matches('\u{feff}');
        let lines: Vec<&str> = content.lines().collect();

        if lines.iter().all(|l| l.trim().is_empty()) {
            return Ok(Vec::new());
        }

        let sample = &lines[..lines.len().min(DETECTION_SAMPLE)];
        let format = detect_whatsapp_format(sample).ok_or_else(|| {
            WatchpackError::invalid_format(
                "WhatsApp",
                "Could not detect WhatsApp export format. \
                 Make sure the file is a valid WhatsApp chat export.",
            )
        })?;
        debug!(?format, lines = lines.len(), "detected WhatsApp export format");

        let regex = format.regex();
        let mut messages: Vec<RawMessage> = Vec::new();
        // Continuation lines after a skipped notice belong to nothing
        let mut open = false;

        for raw_line in &lines {
            let line = strip_direction_marks(raw_line);

            if let Some(caps) = regex.captures(line) {
                let date_str = caps.get(1).map_or("", |m| m.as_str());
                let time_str = caps.get(2).map_or("", |m| m.as_str());
                let sender = caps.get(3).map_or("", |m| m.as_str().trim());
                let text = caps.get(4).map_or("", |m| m.as_str());

                if self.config.skip_system_messages && is_whatsapp_system_message(sender, text) {
                    open = false;
                    continue;
                }

                let mut message = RawMessage::new(text).with_sender(sender);
                if let Some(ts) = parse_whatsapp_timestamp(date_str, time_str, format) {
                    message = message.with_timestamp(ts);
                }
                messages.push(message);
                open = true;
            } else if has_timestamp_prefix(line) {
                // Sender-less notice such as "Alice added Bob"
                open = false;
            } else if open {
                if let Some(last) = messages.last_mut() {
                    last.text.push('\n');
                    last.text.push_str(line);
                }
            }
        }

        Ok(messages)
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn parse(&self, path: &Path) -> Result<Vec<RawMessage>> {
        let content = fs::read_to_string(path)?;
        let mut messages = self.parse_content(&content).map_err(|err| match err {
            WatchpackError::InvalidFormat { message, .. } => {
                WatchpackError::whatsapp_parse(message, Some(path.to_path_buf()))
            }
            other => other,
        })?;

        if self.config.group_from_file_name {
            let group = path
                .file_stem()
                .and_then(|stem| group_name_from_stem(&stem.to_string_lossy()));
            if let Some(group) = group {
                for message in &mut messages {
                    message.meta.group = Some(group.clone());
                }
            }
        }

        Ok(messages)
    }

    fn parse_str(&self, content: &str) -> Result<Vec<RawMessage>> {
        self.parse_content(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::Builder;

    const EXPORT: &str = "\
15/01/2024, 10:30 - Messages and calls are end-to-end encrypted. No one outside of this chat can read them.
15/01/2024, 10:31 - Alice added Bob
15/01/2024, 10:32 - Bob: 🔥 AP used
15500ST 2019 300k
26331ST 2020 280k
15/01/2024, 10:40 - Carol: LF 5711/1A new
15/01/2024, 10:41 - Dave: <Media omitted>";

    #[test]
    fn test_parser_name() {
        let parser = WhatsAppParser::new();
        assert_eq!(parser.name(), "WhatsApp");
        assert_eq!(parser.platform(), Platform::WhatsApp);
    }

    #[test]
    fn test_parse_multiline_and_skip_notices() {
        let messages = WhatsAppParser::new().parse_str(EXPORT).unwrap();
        assert_eq!(messages.len(), 3);

        assert_eq!(messages[0].sender(), Some("Bob"));
        assert_eq!(messages[0].text, "🔥 AP used\n15500ST 2019 300k\n26331ST 2020 280k");
        let ts = messages[0].timestamp().unwrap();
        assert_eq!((ts.day(), ts.month(), ts.hour(), ts.minute()), (15, 1, 10, 32));

        assert_eq!(messages[1].text, "LF 5711/1A new");
        assert_eq!(messages[2].text, "<Media omitted>");
    }

    #[test]
    fn test_keep_system_messages_when_configured() {
        let parser =
            WhatsAppParser::with_config(WhatsAppConfig::new().with_skip_system_messages(false));
        let content = "[15/01/2024, 10:30:45] Alice: security code changed\n\
                       [15/01/2024, 10:31:00] Alice: 126610LN 135k";
        assert_eq!(parser.parse_str(content).unwrap().len(), 2);
    }

    #[test]
    fn test_us_bracketed_with_direction_marks() {
        let content = "\u{200e}[1/15/24, 10:30:45 AM] Alice: 126610LN 2024 new 135k\n\
                       [1/15/24, 2:05:00 PM] Bob: 5711/1A 185k";
        let messages = WhatsAppParser::new().parse_str(content).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].timestamp().unwrap().hour(), 14);
    }

    #[test]
    fn test_empty_content() {
        assert!(WhatsAppParser::new().parse_str("").unwrap().is_empty());
        assert!(WhatsAppParser::new().parse_str("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_unrecognized_format() {
        let err = WhatsAppParser::new().parse_str("hello\nworld").unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_parse_file_group_from_stem() {
        let mut file = Builder::new()
            .prefix("WhatsApp Chat with HK Traders")
            .suffix(".txt")
            .rand_bytes(0)
            .tempfile()
            .unwrap();
        write!(file, "15/01/2024, 10:32 - Bob: 126610LN 135k").unwrap();

        let messages = WhatsAppParser::new().parse(file.path()).unwrap();
        assert_eq!(messages[0].group(), Some("HK Traders"));
    }

    #[test]
    fn test_parse_file_bad_format_carries_path() {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "not an export").unwrap();

        let err = WhatsAppParser::new().parse(file.path()).unwrap_err();
        assert!(err.is_parse());
    }
}
