//! Records, filtering, post-processing and output.
//!
//! This module contains:
//! - [`models`] - [`ExtractedListing`](models::ExtractedListing), requirement records, [`OutputConfig`]
//! - [`filter`] - listing filtering by reference, sender and date
//! - [`processor`] - de-duplication and run statistics
//! - [`output`] - format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv", feature = "json"))]
//! # fn example() {
//! use watchpack::core::{
//!     ExtractedListing, OutputConfig, ListingFilter,
//!     dedupe_listings, apply_filters,
//!     write_csv, write_json, write_jsonl,
//! };
//! # }
//! ```

pub mod filter;
pub mod models;
pub mod output;
pub mod processor;

pub use filter::{ListingFilter, apply_filters};
pub use models::{
    ConditionPreference, ExtractedListing, MessageType, OutputConfig, RequirementMatch,
    RequirementResult,
};

#[cfg(feature = "csv")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};

pub use processor::{ExtractionStats, dedupe_listings};
