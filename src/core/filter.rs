//! Filter extracted listings by reference, sender and date.
//!
//! This module provides [`ListingFilter`] for defining filter criteria and
//! [`apply_filters`] for filtering listing collections.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | PID | [`with_pid`](ListingFilter::with_pid) | Listings for one reference |
//! | PID prefix | [`with_pid_prefix`](ListingFilter::with_pid_prefix) | Listings whose reference starts with a prefix |
//! | Date from | [`with_date_from`](ListingFilter::with_date_from) | Listings on or after date |
//! | Date to | [`with_date_to`](ListingFilter::with_date_to) | Listings on or before date |
//! | Sender | [`with_sender`](ListingFilter::with_sender) | Listings from a specific dealer |
//!
//! # Examples
//!
//! ```
//! use watchpack::core::filter::{ListingFilter, apply_filters};
//! use watchpack::{ExtractedListing, MessageType};
//!
//! let listings = vec![
//!     ExtractedListing::new("5711/1A", "5711/1A 185k", MessageType::Selling),
//!     ExtractedListing::new("126610LN", "126610LN 135k", MessageType::Selling),
//! ];
//!
//! // PIDs are normalized before comparing
//! let filter = ListingFilter::new().with_pid("5711/1a");
//! let filtered = apply_filters(listings, &filter);
//!
//! assert_eq!(filtered.len(), 1);
//! ```
//!
//! # Behavior Notes
//!
//! - Listings without timestamps are **excluded** when date filters are active
//! - Sender matching is case-insensitive for ASCII characters
//! - Multiple filters are combined with AND logic

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::core::models::ExtractedListing;
use crate::error::{Result, WatchpackError};
use crate::extract::normalize_pid;

/// Criteria a listing must meet to be kept.
///
/// Filters are combined with AND logic.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Normalized reference to match.
    pub pid: Option<String>,

    /// Match `pid` as a prefix instead of exactly.
    pub pid_prefix: bool,

    /// Include only listings on or after this timestamp.
    pub after: Option<DateTime<Utc>>,

    /// Include only listings on or before this timestamp.
    pub before: Option<DateTime<Utc>>,

    /// Include only listings from this sender (case-insensitive).
    pub from: Option<String>,
}

impl ListingFilter {
    /// Creates a filter that lets everything through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps listings for exactly this reference.
    #[must_use]
    pub fn with_pid(mut self, pid: &str) -> Self {
        self.pid = Some(normalize_pid(pid));
        self.pid_prefix = false;
        self
    }

    /// Keeps listings whose reference starts with `prefix`, e.g. `5711`
    /// matches `5711/1A` and `5711/1A-010`.
    #[must_use]
    pub fn with_pid_prefix(mut self, prefix: &str) -> Self {
        self.pid = Some(normalize_pid(prefix));
        self.pid_prefix = true;
        self
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        self.after = Some(parse_date(date_str, NaiveTime::MIN)?);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| WatchpackError::invalid_date(date_str))?;
        self.before = Some(parse_date(date_str, end_of_day)?);
        Ok(self)
    }

    /// Sets the sender filter. Matching is case-insensitive for ASCII.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_after(mut self, dt: DateTime<Utc>) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the end timestamp directly.
    #[must_use]
    pub fn with_before(mut self, dt: DateTime<Utc>) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.pid.is_some() || self.has_date_filter() || self.from.is_some()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if the listing passes every active filter.
    pub fn matches(&self, listing: &ExtractedListing) -> bool {
        if let Some(pid) = &self.pid {
            let hit = if self.pid_prefix {
                listing.pid.starts_with(pid.as_str())
            } else {
                listing.pid == *pid
            };
            if !hit {
                return false;
            }
        }

        if let Some(from) = &self.from {
            let same = listing
                .sender
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(from));
            if !same {
                return false;
            }
        }

        if self.has_date_filter() {
            let Some(ts) = listing.timestamp else {
                return false;
            };
            if self.after.is_some_and(|after| ts < after) {
                return false;
            }
            if self.before.is_some_and(|before| ts > before) {
                return false;
            }
        }

        true
    }
}

fn parse_date(date_str: &str, time: NaiveTime) -> Result<DateTime<Utc>> {
    let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| WatchpackError::invalid_date(date_str))?;
    Ok(naive.and_time(time).and_utc())
}

/// Keeps the listings that match all active filters.
///
/// If no filters are active, returns the input unchanged.
pub fn apply_filters(listings: Vec<ExtractedListing>, filter: &ListingFilter) -> Vec<ExtractedListing> {
    if !filter.is_active() {
        return listings;
    }
    listings.into_iter().filter(|l| filter.matches(l)).collect()
}
