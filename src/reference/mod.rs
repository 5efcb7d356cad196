//! Reference catalog: brand, family, model name and product link keyed by
//! reference code.
//!
//! The engine never talks to a database directly. A [`ReferenceSource`]
//! hands over the full catalog; [`ReferenceCache`] turns it into a
//! [`ReferenceIndex`] and refetches it once its age exceeds the configured
//! interval.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use watchpack::reference::{ReferenceCache, ReferenceEntry, StaticReferenceSource};
//!
//! let source = StaticReferenceSource::new(vec![
//!     ReferenceEntry::new("Rolex", "Submariner", "126610LN", "Submariner Date"),
//! ]);
//! let cache = Arc::new(ReferenceCache::new(source, Duration::from_secs(300)));
//!
//! let entry = cache.lookup("126610ln").unwrap();
//! assert_eq!(entry.family, "Submariner");
//! ```

mod cache;
mod clock;
mod source;

use serde::{Deserialize, Serialize};

pub use cache::{ReferenceCache, ReferenceIndex};
pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(feature = "csv")]
pub use source::CsvReferenceSource;
#[cfg(feature = "json")]
pub use source::JsonReferenceSource;
pub use source::{ReferenceSource, StaticReferenceSource};

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub brand: String,
    #[serde(default)]
    pub family: String,
    pub reference: String,
    #[serde(default)]
    pub name: String,
    /// Alternate product id, indexed alongside the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    /// Product page for the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ReferenceEntry {
    pub fn new(
        brand: impl Into<String>,
        family: impl Into<String>,
        reference: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            family: family.into(),
            reference: reference.into(),
            name: name.into(),
            pid: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
