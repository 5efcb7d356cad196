//! Raw chat message handed to the extraction engine.
//!
//! [`RawMessage`] is the input side of the engine: free text plus whatever
//! sender metadata the message source knows. The engine never retains it;
//! metadata is only copied onto the records extracted from it.
//!
//! # Examples
//!
//! ```
//! use watchpack::RawMessage;
//! use chrono::Utc;
//!
//! let msg = RawMessage::new("🍁5267/200A Champ 05/2025 New 798000HKD")
//!     .with_sender("Dealer HK")
//!     .with_group("HK Watch Traders")
//!     .with_timestamp(Utc::now());
//!
//! assert_eq!(msg.sender(), Some("Dealer HK"));
//! assert!(msg.meta.has_metadata());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a message, where, and when.
///
/// All fields are optional; the engine works on bare text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderMeta {
    /// Display name or phone number of the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sender: Option<String>,

    /// Name of the group or channel the message was posted in.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub group: Option<String>,

    /// When the message was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SenderMeta {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Builder method to set the group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Returns `true` if any field is set.
    pub fn has_metadata(&self) -> bool {
        self.sender.is_some() || self.group.is_some() || self.timestamp.is_some()
    }
}

/// A single chat message as received from a message source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Message text, possibly multi-line.
    pub text: String,

    /// Sender metadata.
    #[serde(flatten)]
    pub meta: SenderMeta,
}

impl RawMessage {
    /// Creates a message with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: SenderMeta::default(),
        }
    }

    /// Creates a message with text and metadata.
    pub fn with_meta(text: impl Into<String>, meta: SenderMeta) -> Self {
        Self {
            text: text.into(),
            meta,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.meta.sender = Some(sender.into());
        self
    }

    /// Builder method to set the group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.meta.group = Some(group.into());
        self
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.meta.timestamp = Some(ts);
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the sender, if known.
    pub fn sender(&self) -> Option<&str> {
        self.meta.sender.as_deref()
    }

    /// Returns the group, if known.
    pub fn group(&self) -> Option<&str> {
        self.meta.group.as_deref()
    }

    /// Returns the timestamp, if known.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.meta.timestamp
    }

    /// Returns `true` if the text is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_raw_message_new() {
        let msg = RawMessage::new("5711/1A 185k");
        assert_eq!(msg.text(), "5711/1A 185k");
        assert!(msg.sender().is_none());
        assert!(!msg.meta.has_metadata());
    }

    #[test]
    fn test_raw_message_builder() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let msg = RawMessage::new("hello")
            .with_sender("Alice")
            .with_group("Traders")
            .with_timestamp(ts);

        assert_eq!(msg.sender(), Some("Alice"));
        assert_eq!(msg.group(), Some("Traders"));
        assert_eq!(msg.timestamp(), Some(ts));
        assert!(msg.meta.has_metadata());
    }

    #[test]
    fn test_raw_message_is_empty() {
        assert!(RawMessage::new("").is_empty());
        assert!(RawMessage::new("  \n ").is_empty());
        assert!(!RawMessage::new("126610LN").is_empty());
    }

    #[test]
    fn test_raw_message_serde_flattens_meta() {
        let msg = RawMessage::new("5711/1A").with_sender("Bob");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""sender":"Bob""#));
        assert!(!json.contains("meta"));
        assert!(!json.contains("timestamp"));

        let parsed: RawMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
