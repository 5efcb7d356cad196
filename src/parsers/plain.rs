//! Plain text input: the whole file is one message.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::message::RawMessage;
use crate::parser::{Parser, Platform};

/// Reads a text file as a single message, e.g. a stock list pasted from a
/// dealer's broadcast.
///
/// The file stem becomes the group name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PlainTextParser {
    fn name(&self) -> &'static str {
        "Plain text"
    }

    fn platform(&self) -> Platform {
        Platform::Plain
    }

    fn parse(&self, path: &Path) -> Result<Vec<RawMessage>> {
        let content = fs::read_to_string(path)?;
        let group = path
            .file_stem()
            .map(|s| s.to_string_lossy().trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(self
            .parse_str(&content)?
            .into_iter()
            .map(|msg| match &group {
                Some(group) => msg.with_group(group.clone()),
                None => msg,
            })
            .collect())
    }

    fn parse_str(&self, content: &str) -> Result<Vec<RawMessage>> {
        let message = RawMessage::new(content.trim_start_matches('\u{feff}'));
        if message.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![message])
    }
}
