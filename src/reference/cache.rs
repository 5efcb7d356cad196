//! Reference index and its time-bounded cache.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::source::ReferenceSource;
use super::ReferenceEntry;
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extract::normalize_pid;

/// Keys shorter than this never take part in prefix matching.
const MIN_PREFIX_LEN: usize = 4;

/// Immutable lookup table built from one catalog fetch.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    keys: BTreeMap<String, Arc<ReferenceEntry>>,
    entries: usize,
}

/// Text before a trailing `-suffix`, e.g. `5711/1A` for `5711/1A-010`.
fn base_reference(reference: &str) -> Option<&str> {
    let (base, suffix) = reference.rsplit_once('-')?;
    let plausible = !base.is_empty()
        && (1..=4).contains(&suffix.len())
        && suffix.chars().all(|c| c.is_ascii_alphanumeric());
    plausible.then_some(base)
}

impl ReferenceIndex {
    /// Indexes each entry under its reference, its pid and its base
    /// reference. When two entries claim a key the earlier one keeps it.
    pub fn build(entries: Vec<ReferenceEntry>) -> Self {
        let mut keys = BTreeMap::new();
        let count = entries.len();

        for entry in entries {
            let entry = Arc::new(entry);
            let reference = normalize_pid(&entry.reference);
            let mut candidates = vec![reference.clone()];
            if let Some(pid) = &entry.pid {
                candidates.push(normalize_pid(pid));
            }
            if let Some(base) = base_reference(&reference) {
                candidates.push(base.to_string());
            }
            for key in candidates {
                if !key.is_empty() {
                    keys.entry(key).or_insert_with(|| Arc::clone(&entry));
                }
            }
        }

        Self {
            keys,
            entries: count,
        }
    }

    /// Number of catalog entries the index was built from.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of distinct lookup keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Finds the entry for a PID: exact key first, then the first key in
    /// ascending order that is a prefix of the PID.
    pub fn lookup(&self, pid: &str) -> Option<&ReferenceEntry> {
        self.lookup_shared(pid).map(Arc::as_ref)
    }

    fn lookup_shared(&self, pid: &str) -> Option<&Arc<ReferenceEntry>> {
        let key = normalize_pid(pid);
        if key.is_empty() {
            return None;
        }
        if let Some(entry) = self.keys.get(&key) {
            return Some(entry);
        }
        if key.len() < MIN_PREFIX_LEN {
            return None;
        }
        self.keys
            .iter()
            .filter(|(candidate, _)| candidate.len() >= MIN_PREFIX_LEN)
            .find(|(candidate, _)| key.starts_with(candidate.as_str()))
            .map(|(_, entry)| entry)
    }
}

struct Snapshot {
    index: Arc<ReferenceIndex>,
    loaded_at: Option<DateTime<Utc>>,
}

/// Shared, periodically refreshed [`ReferenceIndex`].
///
/// Readers clone an `Arc` of the current index and never see a half-built
/// one. Refreshes are serialized; callers that queued behind a refresh
/// re-check staleness and skip their own fetch.
pub struct ReferenceCache {
    source: Box<dyn ReferenceSource>,
    clock: Arc<dyn Clock>,
    refresh_interval: TimeDelta,
    snapshot: RwLock<Snapshot>,
    refresh_gate: Mutex<()>,
}

impl std::fmt::Debug for ReferenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceCache")
            .field("source", &self.source.name())
            .field("refresh_interval", &self.refresh_interval)
            .field("loaded_at", &self.loaded_at())
            .finish_non_exhaustive()
    }
}

impl ReferenceCache {
    /// Creates an empty cache on the system clock. Nothing is fetched
    /// until first use.
    pub fn new(source: impl ReferenceSource + 'static, refresh_interval: Duration) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), refresh_interval)
    }

    pub fn with_clock(
        source: impl ReferenceSource + 'static,
        clock: Arc<dyn Clock>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source: Box::new(source),
            clock,
            refresh_interval: TimeDelta::from_std(refresh_interval)
                .unwrap_or_else(|_| TimeDelta::days(36_500)),
            snapshot: RwLock::new(Snapshot {
                index: Arc::new(ReferenceIndex::default()),
                loaded_at: None,
            }),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Creates a cache using the configured refresh interval.
    pub fn from_config(source: impl ReferenceSource + 'static, config: &ExtractorConfig) -> Self {
        Self::new(source, Duration::from_secs(config.refresh_interval_secs))
    }

    /// When the current snapshot was loaded (or last attempted).
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.read_snapshot(|s| s.loaded_at)
    }

    /// Returns `true` if the snapshot was never loaded or is older than the
    /// refresh interval.
    pub fn is_stale(&self) -> bool {
        match self.loaded_at() {
            None => true,
            Some(at) => self.clock.now() - at > self.refresh_interval,
        }
    }

    /// Returns the current index without refreshing.
    pub fn snapshot(&self) -> Arc<ReferenceIndex> {
        self.read_snapshot(|s| Arc::clone(&s.index))
    }

    /// Refreshes if stale, then returns the current index.
    pub fn index(&self) -> Arc<ReferenceIndex> {
        self.ensure_fresh();
        self.snapshot()
    }

    /// Looks up a PID in a fresh index.
    pub fn lookup(&self, pid: &str) -> Option<Arc<ReferenceEntry>> {
        self.index().lookup_shared(pid).cloned()
    }

    /// Fetches the catalog now regardless of age. Returns the entry count.
    pub fn refresh(&self) -> Result<usize> {
        let _gate = self
            .refresh_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.reload()
    }

    /// Refreshes a stale cache. Failures are logged and the previous index
    /// stays in service until the next interval elapses.
    pub fn ensure_fresh(&self) {
        if !self.is_stale() {
            return;
        }
        let _gate = self
            .refresh_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // another caller may have refreshed while we waited
        if !self.is_stale() {
            return;
        }
        if let Err(err) = self.reload() {
            warn!(
                source = self.source.name(),
                error = %err,
                "reference refresh failed, keeping previous catalog"
            );
        }
    }

    fn reload(&self) -> Result<usize> {
        let now = self.clock.now();
        match self.source.fetch_all() {
            Ok(entries) => {
                let index = Arc::new(ReferenceIndex::build(entries));
                let count = index.len();
                self.write_snapshot(Snapshot {
                    index,
                    loaded_at: Some(now),
                });
                info!(source = self.source.name(), entries = count, "reference catalog loaded");
                Ok(count)
            }
            Err(err) => {
                let index = self.snapshot();
                self.write_snapshot(Snapshot {
                    index,
                    loaded_at: Some(now),
                });
                Err(err)
            }
        }
    }

    fn read_snapshot<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write_snapshot(&self, snapshot: Snapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchpackError;
    use crate::reference::{ManualClock, StaticReferenceSource};
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> Vec<ReferenceEntry> {
        vec![
            ReferenceEntry::new("Patek Philippe", "Nautilus", "5711/1A-010", "Nautilus Blue"),
            ReferenceEntry::new("Rolex", "Submariner", "126610LN", "Submariner Date"),
            ReferenceEntry::new("Rolex", "Daytona", "126500LN", "Daytona White")
                .with_pid("RLX-126500"),
        ]
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_index_exact_base_and_pid_keys() {
        let index = ReferenceIndex::build(catalog());
        assert_eq!(index.len(), 3);
        assert_eq!(index.lookup("5711/1A-010").unwrap().family, "Nautilus");
        assert_eq!(index.lookup("5711/1a").unwrap().family, "Nautilus");
        assert_eq!(index.lookup("rlx-126500").unwrap().family, "Daytona");
        assert_eq!(index.lookup(" 126610 ln ").unwrap().family, "Submariner");
    }

    #[test]
    fn test_index_prefix_fallback() {
        let index = ReferenceIndex::build(catalog());
        // pid extends a key
        assert_eq!(index.lookup("126610LNV").unwrap().family, "Submariner");
        // a partial pid never borrows a longer reference
        assert!(index.lookup("12650").is_none());
        assert!(index.lookup("126610").is_none());
        assert!(index.lookup("999999").is_none());
        assert!(index.lookup("12").is_none());
        assert!(index.lookup("").is_none());
    }

    #[test]
    fn test_index_prefix_fallback_is_ordered() {
        let index = ReferenceIndex::build(vec![
            ReferenceEntry::new("B", "Second", "1266", ""),
            ReferenceEntry::new("A", "First", "12661", ""),
        ]);
        // both keys are prefixes; "1266" sorts first
        assert_eq!(index.lookup("126610LN").unwrap().family, "Second");
    }

    #[test]
    fn test_first_entry_keeps_duplicate_key() {
        let index = ReferenceIndex::build(vec![
            ReferenceEntry::new("Rolex", "Old", "126610LN", ""),
            ReferenceEntry::new("Rolex", "New", "126610LN", ""),
        ]);
        assert_eq!(index.lookup("126610LN").unwrap().family, "Old");
    }

    #[test]
    fn test_cache_refreshes_after_interval() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fetches);
        let source = move || -> Result<Vec<ReferenceEntry>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(catalog())
        };
        let clock = Arc::new(ManualClock::new(start()));
        let cache = ReferenceCache::with_clock(source, clock.clone(), Duration::from_secs(300));

        assert!(cache.is_stale());
        assert!(cache.lookup("126610LN").is_some());
        assert!(cache.lookup("5711/1A").is_some());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        clock.advance(TimeDelta::seconds(300));
        assert!(!cache.is_stale());
        cache.ensure_fresh();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        clock.advance(TimeDelta::seconds(1));
        assert!(cache.is_stale());
        cache.ensure_fresh();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_failure_keeps_previous_index() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = move || -> Result<Vec<ReferenceEntry>> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(catalog())
            } else {
                Err(WatchpackError::reference_unavailable("test", "offline"))
            }
        };
        let clock = Arc::new(ManualClock::new(start()));
        let cache = ReferenceCache::with_clock(source, clock.clone(), Duration::from_secs(60));

        assert!(cache.lookup("126610LN").is_some());
        clock.advance(TimeDelta::seconds(61));
        assert!(cache.lookup("126610LN").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_cache_unavailable_source_degrades() {
        let source = || -> Result<Vec<ReferenceEntry>> {
            Err(WatchpackError::reference_unavailable("test", "offline"))
        };
        let cache = ReferenceCache::new(source, Duration::from_secs(60));
        assert!(cache.lookup("126610LN").is_none());
        assert!(cache.snapshot().is_empty());
        assert!(cache.refresh().unwrap_err().is_reference());
    }

    #[test]
    fn test_cache_concurrent_readers_single_fetch() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fetches);
        let source = move || -> Result<Vec<ReferenceEntry>> {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            Ok(catalog())
        };
        let clock = Arc::new(ManualClock::new(start()));
        let cache = Arc::new(ReferenceCache::with_clock(
            source,
            clock,
            Duration::from_secs(300),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.lookup("126500LN").is_some())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_static_source_refresh_count() {
        let cache = ReferenceCache::new(StaticReferenceSource::new(catalog()), Duration::from_secs(5));
        assert_eq!(cache.refresh().unwrap(), 3);
        assert_eq!(cache.snapshot().len(), 3);
    }
}
