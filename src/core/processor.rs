//! Post-processing of extracted listings.

use std::collections::HashSet;

use super::models::{ExtractedListing, MessageType};

/// Removes repeated listings, keeping the first occurrence.
///
/// Dealers repost the same stock list across groups and days. Two records
/// are duplicates when reference, price, currency, condition, year and the
/// source line all agree; sender and timestamp are ignored.
///
/// # Example
/// Input:  [5711/1A 185k (Mon), 126610LN 135k, 5711/1A 185k (Tue)]
/// Output: [5711/1A 185k (Mon), 126610LN 135k]
pub fn dedupe_listings(listings: Vec<ExtractedListing>) -> Vec<ExtractedListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|l| {
            seen.insert((
                l.pid.clone(),
                l.price,
                l.currency.clone(),
                l.condition.clone(),
                l.year.clone(),
                l.raw_line.clone(),
            ))
        })
        .collect()
}

/// Counters for one extraction run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Messages fed to the extractor
    pub messages: usize,
    /// Messages that passed the trade gate
    pub trade_messages: usize,
    /// Listings emitted before de-duplication
    pub listings: usize,
    /// Listings left after de-duplication and filtering
    pub kept_listings: usize,
    /// Listings classified as buy requests
    pub looking_for: usize,
    /// Messages recognized as buy requests
    pub requirement_messages: usize,
    /// References asked for across all buy requests
    pub requirements: usize,
    /// Listings with catalog data attached
    pub enriched: usize,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the listings produced by one message.
    pub fn record_listings(&mut self, listings: &[ExtractedListing]) {
        self.listings += listings.len();
        self.looking_for += listings
            .iter()
            .filter(|l| l.message_type == MessageType::LookingFor)
            .count();
        self.enriched += listings.iter().filter(|l| l.is_enriched()).count();
    }

    /// Average number of listings per trade message.
    pub fn listings_per_message(&self) -> f64 {
        if self.trade_messages == 0 {
            return 0.0;
        }
        self.listings as f64 / self.trade_messages as f64
    }

    /// Percentage of listings removed by de-duplication and filtering.
    pub fn reduction_ratio(&self) -> f64 {
        if self.listings == 0 {
            return 0.0;
        }
        (1.0 - (self.kept_listings as f64 / self.listings as f64)) * 100.0
    }
}
