//! # Watchpack
//!
//! Extract structured watch listings and buy requests from the free-text
//! messages posted in watch trading group chats.
//!
//! ## Overview
//!
//! Dealers post stock lists like
//!
//! ```text
//! 🔥 AP used
//! 15500ST 2019 300k
//! 26331ST 2020 280k
//! ```
//!
//! and buyers ask `LF 5711/1A new`. Watchpack turns each watch in such a
//! message into an [`ExtractedListing`] with reference number, year,
//! condition, dial/metal/bracelet variant, price and currency, and
//! optionally enriches it from a reference catalog.
//!
//! ## Quick Start
//!
//! ```rust
//! use watchpack::{Extractor, ExtractorConfig, MessageType};
//!
//! let extractor = Extractor::new(ExtractorConfig::default());
//! let listings = extractor.parse("🔥 AP used\n15500ST 2019 300k\n26331ST 2020 280k");
//!
//! assert_eq!(listings.len(), 2);
//! assert_eq!(listings[0].pid, "15500ST");
//! assert_eq!(listings[0].condition.as_deref(), Some("Used"));
//! assert_eq!(listings[1].price, Some(280_000));
//! assert_eq!(listings[1].message_type, MessageType::Selling);
//! ```
//!
//! ## Reading Chat Exports
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "whatsapp", feature = "csv"))]
//! # fn main() -> watchpack::Result<()> {
//! use watchpack::prelude::*;
//!
//! let messages = create_parser(Platform::WhatsApp)
//!     .parse("WhatsApp Chat with HK Traders.txt".as_ref())?;
//!
//! let extractor = Extractor::default();
//! let listings: Vec<_> = messages.iter().flat_map(|m| extractor.parse_message(m)).collect();
//!
//! let listings = dedupe_listings(apply_filters(listings, &ListingFilter::new().with_pid_prefix("5711")));
//! write_csv(&listings, "5711.csv", &OutputConfig::new().with_senders())?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "whatsapp", feature = "csv")))]
//! # fn main() {}
//! ```
//!
//! ## Module Structure
//!
//! - [`extract`] — the extraction engine ([`Extractor`]) and its building blocks
//! - [`reference`] — reference catalog sources and the refreshing cache
//! - [`core`] — records, filtering, de-duplication and output writers
//! - [`parser`] / [`parsers`] — chat export input ([`Parser`](parser::Parser), [`Platform`](parser::Platform))
//! - [`config`] — [`ExtractorConfig`] and parser settings
//! - [`format`] — output format selection
//! - [`error`] — [`WatchpackError`] and [`Result`]
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod reference;

pub use config::ExtractorConfig;
pub use core::models::{
    ConditionPreference, ExtractedListing, MessageType, RequirementMatch, RequirementResult,
};
pub use error::{Result, WatchpackError};
pub use extract::Extractor;
pub use message::{RawMessage, SenderMeta};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use watchpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ConditionPreference, ExtractedListing, Extractor, ExtractorConfig, MessageType, RawMessage,
        RequirementMatch, RequirementResult, SenderMeta,
    };

    pub use crate::error::{Result, WatchpackError};

    pub use crate::parser::{Parser, Platform, create_parser};

    #[cfg(feature = "whatsapp")]
    pub use crate::config::WhatsAppConfig;

    pub use crate::reference::{
        Clock, ReferenceCache, ReferenceEntry, ReferenceSource, StaticReferenceSource,
    };

    pub use crate::core::filter::{ListingFilter, apply_filters};
    pub use crate::core::models::OutputConfig;
    pub use crate::core::processor::{ExtractionStats, dedupe_listings};

    #[cfg(feature = "csv")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
