//! Configuration types for the extractor and chat-export parsers.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ExtractorConfig`] - extraction engine settings
//! - [`WhatsAppConfig`] - WhatsApp TXT export settings
//!
//! # Example
//!
//! ```rust
//! use watchpack::config::ExtractorConfig;
//!
//! let config = ExtractorConfig::new()
//!     .with_fallback_currency("USD")
//!     .with_refresh_interval_secs(600);
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchpackError};

/// Configuration for the extraction engine.
///
/// All fields have defaults, so a JSON config file only needs to name the
/// settings it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Currency assumed when a price carries no currency token (default: HKD)
    pub fallback_currency: String,

    /// Segments whose trimmed length is at or below this many characters are
    /// considered trivial by the segmenter (default: 10)
    pub min_segment_len: usize,

    /// Maximum age of the reference cache before it is refetched (default: 300)
    pub refresh_interval_secs: u64,

    /// Drop media placeholder lines like `<Media omitted>` before
    /// segmenting (default: true)
    pub skip_media_placeholders: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fallback_currency: "HKD".to_string(),
            min_segment_len: 10,
            refresh_interval_secs: 300,
            skip_media_placeholders: true,
        }
    }
}

impl ExtractorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback currency. Stored upper-cased.
    #[must_use]
    pub fn with_fallback_currency(mut self, currency: impl Into<String>) -> Self {
        self.fallback_currency = currency.into().trim().to_uppercase();
        self
    }

    /// Sets the minimum non-trivial segment length.
    #[must_use]
    pub fn with_min_segment_len(mut self, len: usize) -> Self {
        self.min_segment_len = len;
        self
    }

    /// Sets the reference cache refresh interval in seconds.
    #[must_use]
    pub fn with_refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    /// Sets whether media placeholder lines are dropped.
    #[must_use]
    pub fn with_skip_media_placeholders(mut self, skip: bool) -> Self {
        self.skip_media_placeholders = skip;
        self
    }

    /// Checks the settings for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let currency = self.fallback_currency.trim();
        if currency.is_empty() {
            return Err(WatchpackError::invalid_config(
                "fallback_currency must not be empty",
            ));
        }
        if !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WatchpackError::invalid_config(format!(
                "fallback_currency '{currency}' must be an alphabetic currency code"
            )));
        }
        if self.refresh_interval_secs == 0 {
            return Err(WatchpackError::invalid_config(
                "refresh_interval_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from a JSON string.
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.fallback_currency = config.fallback_currency.trim().to_uppercase();
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration from a JSON file.
    #[cfg(feature = "json")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Configuration for WhatsApp export parsing.
///
/// WhatsApp exports are TXT files with various locale-specific date formats.
/// The parser auto-detects the format by analyzing the first 20 lines.
///
/// # Example
///
/// ```rust
/// use watchpack::config::WhatsAppConfig;
///
/// let config = WhatsAppConfig::new()
///     .with_skip_system_messages(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Skip system messages (user added/removed, etc.) (default: true)
    pub skip_system_messages: bool,

    /// Use the file stem as the group name of every message (default: true)
    pub group_from_file_name: bool,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            skip_system_messages: true,
            group_from_file_name: true,
        }
    }
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to skip system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }

    /// Sets whether the file stem becomes the group name.
    #[must_use]
    pub fn with_group_from_file_name(mut self, enabled: bool) -> Self {
        self.group_from_file_name = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_config_default() {
        let config = ExtractorConfig::default();
        assert_eq!(config.fallback_currency, "HKD");
        assert_eq!(config.min_segment_len, 10);
        assert_eq!(config.refresh_interval_secs, 300);
        assert!(config.skip_media_placeholders);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extractor_config_builder() {
        let config = ExtractorConfig::new()
            .with_fallback_currency(" usd ")
            .with_min_segment_len(6)
            .with_refresh_interval_secs(60)
            .with_skip_media_placeholders(false);

        assert_eq!(config.fallback_currency, "USD");
        assert_eq!(config.min_segment_len, 6);
        assert_eq!(config.refresh_interval_secs, 60);
        assert!(!config.skip_media_placeholders);
    }

    #[test]
    fn test_validate_rejects_empty_currency() {
        let config = ExtractorConfig::new().with_fallback_currency("");
        assert!(config.validate().unwrap_err().is_invalid_config());
    }

    #[test]
    fn test_validate_rejects_symbol_currency() {
        let config = ExtractorConfig::new().with_fallback_currency("$");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ExtractorConfig::new().with_refresh_interval_secs(0);
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_partial() {
        let config =
            ExtractorConfig::from_json_str(r#"{"fallback_currency": "eur"}"#).unwrap();
        assert_eq!(config.fallback_currency, "EUR");
        assert_eq!(config.min_segment_len, 10);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_invalid() {
        assert!(ExtractorConfig::from_json_str(r#"{"refresh_interval_secs": 0}"#).is_err());
        assert!(ExtractorConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_whatsapp_config_default() {
        let config = WhatsAppConfig::default();
        assert!(config.skip_system_messages);
        assert!(config.group_from_file_name);
    }
}
