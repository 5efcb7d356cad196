//! Where reference catalogs come from.
//!
//! Any `Fn() -> Result<Vec<ReferenceEntry>>` is a source, which is how a
//! database-backed collaborator plugs in. File-backed sources reread the
//! file on every fetch so edits show up at the next refresh.

#[cfg(any(feature = "csv", feature = "json"))]
use std::path::{Path, PathBuf};

use super::ReferenceEntry;
use crate::error::Result;
#[cfg(feature = "csv")]
use crate::error::WatchpackError;

/// Supplies the full reference catalog.
pub trait ReferenceSource: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &str {
        "reference source"
    }

    /// Returns every catalog entry.
    fn fetch_all(&self) -> Result<Vec<ReferenceEntry>>;
}

impl<F> ReferenceSource for F
where
    F: Fn() -> Result<Vec<ReferenceEntry>> + Send + Sync,
{
    fn name(&self) -> &str {
        "callback"
    }

    fn fetch_all(&self) -> Result<Vec<ReferenceEntry>> {
        self()
    }
}

/// A fixed, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceSource {
    entries: Vec<ReferenceEntry>,
}

impl StaticReferenceSource {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }
}

impl ReferenceSource for StaticReferenceSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_all(&self) -> Result<Vec<ReferenceEntry>> {
        Ok(self.entries.clone())
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Column positions located from a catalog header row.
#[cfg(feature = "csv")]
#[derive(Debug, Default, PartialEq, Eq)]
struct CatalogColumns {
    pid: Option<usize>,
    reference: Option<usize>,
    brand: Option<usize>,
    family: Option<usize>,
    name: Option<usize>,
    url: Option<usize>,
}

#[cfg(feature = "csv")]
impl CatalogColumns {
    /// Assigns each header to the first empty role it fits. Roles are
    /// tried in order, so `Brand Name` becomes the brand column.
    fn locate(headers: &csv::StringRecord) -> Self {
        let mut columns = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            let slot = if (h.contains("url") || h.contains("link")) && columns.url.is_none() {
                &mut columns.url
            } else if (h == "pid" || h.contains("product id") || h == "product_id")
                && columns.pid.is_none()
            {
                &mut columns.pid
            } else if (h.contains("reference")
                || h.contains("referance")
                || h == "ref"
                || h.starts_with("ref ")
                || h.starts_with("ref."))
                && columns.reference.is_none()
            {
                &mut columns.reference
            } else if h.contains("brand") && columns.brand.is_none() {
                &mut columns.brand
            } else if (h.contains("family")
                || h.contains("collection")
                || h.contains("series")
                || h == "model")
                && columns.family.is_none()
            {
                &mut columns.family
            } else if (h.contains("name") || h.contains("title") || h == "description")
                && columns.name.is_none()
            {
                &mut columns.name
            } else {
                continue;
            };
            *slot = Some(idx);
        }
        columns
    }

    fn field(record: &csv::StringRecord, column: Option<usize>) -> String {
        column
            .and_then(|idx| record.get(idx))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn entry(&self, record: &csv::StringRecord) -> Option<ReferenceEntry> {
        let pid = Self::field(record, self.pid);
        let mut reference = Self::field(record, self.reference);
        if reference.is_empty() {
            reference.clone_from(&pid);
        }
        if reference.is_empty() {
            return None;
        }
        let mut entry = ReferenceEntry::new(
            Self::field(record, self.brand),
            Self::field(record, self.family),
            reference,
            Self::field(record, self.name),
        );
        if !pid.is_empty() {
            entry.pid = Some(pid);
        }
        let url = Self::field(record, self.url);
        if !url.is_empty() {
            entry.url = Some(url);
        }
        Some(entry)
    }
}

/// Reads a catalog spreadsheet exported as CSV.
///
/// Columns are found by header name: url/link; brand;
/// family/collection/series/model; reference/ref; name/title; pid/product
/// id. At least a reference or a pid column is required.
#[cfg(feature = "csv")]
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    path: PathBuf,
    delimiter: u8,
}

#[cfg(feature = "csv")]
impl CsvReferenceSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[cfg(feature = "csv")]
impl ReferenceSource for CsvReferenceSource {
    fn name(&self) -> &str {
        "csv catalog"
    }

    fn fetch_all(&self) -> Result<Vec<ReferenceEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let columns = CatalogColumns::locate(reader.headers()?);
        if columns.reference.is_none() && columns.pid.is_none() {
            return Err(WatchpackError::reference_parse(
                "reference CSV",
                "no reference or pid column in header row",
                Some(self.path.clone()),
            ));
        }

        let mut entries = Vec::new();
        for record in reader.records() {
            if let Some(entry) = columns.entry(&record?) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Reads a JSON array of [`ReferenceEntry`] objects.
#[cfg(feature = "json")]
#[derive(Debug, Clone)]
pub struct JsonReferenceSource {
    path: PathBuf,
}

#[cfg(feature = "json")]
impl JsonReferenceSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[cfg(feature = "json")]
impl ReferenceSource for JsonReferenceSource {
    fn name(&self) -> &str {
        "json catalog"
    }

    fn fetch_all(&self) -> Result<Vec<ReferenceEntry>> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
