//! Output format writers.
//!
//! This module provides writers for extracted listings:
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter, one row per listing - requires `csv` feature
//! - [`write_json`] / [`to_json`] - JSON array of listings - requires `json` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one listing per line - requires `json` feature
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | CSV | Spreadsheets, price comparison |
//! | JSON | Structured data, APIs |
//! | JSONL | Appending to a running price log, streaming into other tools |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv", feature = "json"))]
//! # fn main() -> watchpack::Result<()> {
//! use watchpack::core::output::{write_csv, write_json, write_jsonl, to_csv};
//! use watchpack::core::models::OutputConfig;
//! use watchpack::Extractor;
//!
//! let listings = Extractor::default().parse("126610LN 2024 new 135k\n5711/1A 2021 used 1.1m");
//!
//! let config = OutputConfig::new().with_timestamps();
//!
//! // Write to files
//! write_csv(&listings, "listings.csv", &config)?;
//! write_json(&listings, "listings.json", &config)?;
//! write_jsonl(&listings, "listings.jsonl", &config)?;
//!
//! // Or get as strings
//! let csv_string = to_csv(&listings, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv", feature = "json")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv")]
mod csv_writer;
#[cfg(feature = "json")]
mod json_writer;
#[cfg(feature = "json")]
mod jsonl_writer;

#[cfg(feature = "csv")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

#[cfg(feature = "json")]
use serde::Serialize;

#[cfg(feature = "json")]
use crate::core::models::{ExtractedListing, MessageType, OutputConfig};

/// Listing shape shared by the JSON and JSONL writers.
/// Metadata fields appear only when enabled in `OutputConfig`.
#[cfg(feature = "json")]
#[derive(Serialize)]
struct JsonListing<'a> {
    pid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    family: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand_hint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<&'a str>,
    message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    raw_line: &'a str,
}

#[cfg(feature = "json")]
impl<'a> JsonListing<'a> {
    fn from_listing(listing: &'a ExtractedListing, config: &OutputConfig) -> Self {
        let (sender, group) = if config.include_senders {
            (listing.sender.as_deref(), listing.group.as_deref())
        } else {
            (None, None)
        };
        Self {
            pid: &listing.pid,
            brand: listing.brand.as_deref(),
            family: listing.family.as_deref(),
            name: listing.name.as_deref(),
            url: listing.url.as_deref(),
            brand_hint: listing.brand_hint.as_deref(),
            year: listing.year.as_deref(),
            variant: listing.variant.as_deref(),
            condition: listing.condition.as_deref(),
            month: listing.month.as_deref(),
            price: listing.price,
            currency: listing.currency.as_deref(),
            message_type: listing.message_type,
            sender,
            group,
            timestamp: if config.include_timestamps {
                listing
                    .timestamp
                    .map(|ts| ts.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            } else {
                None
            },
            raw_line: &listing.raw_line,
        }
    }
}
