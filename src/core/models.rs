//! Core data models for extracted records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::SenderMeta;

/// Whether a message offers a watch or asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Selling,
    LookingFor,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Selling => "selling",
            MessageType::LookingFor => "looking_for",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One watch offered in a message.
///
/// A listing exists only if a reference number was found; every other
/// field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedListing {
    /// Normalized reference number (upper-case, no whitespace)
    pub pid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Catalog brand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Catalog product link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Brand named by a section header, independent of the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_hint: Option<String>,
    /// Segment text exactly as it appeared in the message
    pub raw_line: String,
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExtractedListing {
    /// Creates a listing with only the required fields.
    pub fn new(
        pid: impl Into<String>,
        raw_line: impl Into<String>,
        message_type: MessageType,
    ) -> Self {
        Self {
            pid: pid.into(),
            year: None,
            variant: None,
            condition: None,
            month: None,
            price: None,
            currency: None,
            brand: None,
            family: None,
            name: None,
            url: None,
            brand_hint: None,
            raw_line: raw_line.into(),
            message_type,
            sender: None,
            group: None,
            timestamp: None,
        }
    }

    /// Sets price and currency together.
    #[must_use]
    pub fn with_price(mut self, amount: u64, currency: impl Into<String>) -> Self {
        self.price = Some(amount);
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Copies sender metadata onto the record.
    #[must_use]
    pub fn with_meta(mut self, meta: &SenderMeta) -> Self {
        self.sender.clone_from(&meta.sender);
        self.group.clone_from(&meta.group);
        self.timestamp = meta.timestamp;
        self
    }

    /// Returns `true` if catalog enrichment filled any field.
    pub fn is_enriched(&self) -> bool {
        self.brand.is_some() || self.family.is_some() || self.name.is_some() || self.url.is_some()
    }
}

/// How a buyer wants the watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionPreference {
    New,
    Used,
    Both,
}

impl fmt::Display for ConditionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConditionPreference::New => "new",
            ConditionPreference::Used => "used",
            ConditionPreference::Both => "both",
        })
    }
}

/// One reference a buyer asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub pid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionPreference>,
    /// The line the reference was found on
    pub raw_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RequirementMatch {
    pub fn new(
        pid: impl Into<String>,
        raw_line: impl Into<String>,
        condition: Option<ConditionPreference>,
    ) -> Self {
        Self {
            pid: pid.into(),
            brand: None,
            family: None,
            name: None,
            url: None,
            condition,
            raw_line: raw_line.into(),
            sender: None,
            group: None,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: &SenderMeta) -> Self {
        self.sender.clone_from(&meta.sender);
        self.group.clone_from(&meta.group);
        self.timestamp = meta.timestamp;
        self
    }
}

/// Outcome of buy-request extraction for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementResult {
    pub requirements: Vec<RequirementMatch>,
    pub is_requirement_message: bool,
    pub message_type: MessageType,
}

/// Configuration for output format.
/// Controls which metadata columns are included in the output.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Include sender and group columns
    pub include_senders: bool,
    /// Include timestamps in output
    pub include_timestamps: bool,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes every metadata column.
    pub fn all() -> Self {
        Self {
            include_senders: true,
            include_timestamps: true,
        }
    }

    #[must_use]
    pub fn with_senders(mut self) -> Self {
        self.include_senders = true;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.include_timestamps = true;
        self
    }
}
