//! Time-windowed in-memory caches for resolved prices and image URLs, plus the
//! small on-disk JSON cache used for the set catalog.
//!
//! Entries are fresh while `now - timestamp < ttl`. Stale entries are kept so
//! resolvers can fall back to the last known value when the upstream API is
//! unavailable. Growth is bounded by a sweep that drops entries older than the
//! retention window once the map exceeds a soft size bound.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::{to_chrono, Clock};
use crate::config;
use crate::error::Result;

/// A cached value and the moment it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub timestamp: DateTime<Utc>,
}

/// Result of a lookup that may return stale data.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<T> {
    pub value: T,
    pub fresh: bool,
    pub timestamp: DateTime<Utc>,
}

/// Thread-safe TTL cache keyed by normalized card identity.
pub struct TimedCache<V> {
    ttl: Duration,
    retention: Duration,
    sweep_threshold: usize,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

/// Cached representative price per card. `None` records that the provider had
/// no usable price, which avoids re-querying within the freshness window.
pub type PriceCache = TimedCache<Option<f64>>;
/// Cached high-resolution artwork URL per card.
pub type ImageCache = TimedCache<String>;

impl<V: Clone> TimedCache<V> {
    /// Create a cache with the given freshness window and the default sweep policy.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            retention: ttl * config::CACHE_RETENTION_FACTOR,
            sweep_threshold: config::CACHE_SWEEP_THRESHOLD,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Override the sweep policy.
    pub fn with_sweep(mut self, retention: Duration, sweep_threshold: usize) -> Self {
        self.retention = retention.max(self.ttl);
        self.sweep_threshold = sweep_threshold;
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.timestamp < to_chrono(self.ttl)
    }

    /// Return the value for `key` only if it is still fresh.
    pub fn get_fresh(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        self.lock()
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone())
    }

    /// Return the value for `key` whether fresh or stale.
    pub fn get(&self, key: &str) -> Option<CacheLookup<V>> {
        let now = self.clock.now();
        self.lock().get(key).map(|entry| CacheLookup {
            value: entry.value.clone(),
            fresh: self.is_fresh(entry, now),
            timestamp: entry.timestamp,
        })
    }

    pub fn contains_fresh(&self, key: &str) -> bool {
        self.get_fresh(key).is_some()
    }

    /// Write `value` under `key`, superseding any previous entry.
    pub fn insert(&self, key: &str, value: V) {
        let now = self.clock.now();
        let mut entries = self.lock();
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                timestamp: now,
            },
        );
        if entries.len() > self.sweep_threshold {
            let removed = Self::sweep_locked(&mut entries, now, self.retention);
            log::debug!("Cache sweep removed {} entries", removed);
        }
    }

    /// Drop every entry older than the retention window. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        Self::sweep_locked(&mut entries, now, self.retention)
    }

    fn sweep_locked(
        entries: &mut HashMap<String, CacheEntry<V>>,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> usize {
        let before = entries.len();
        let retention = to_chrono(retention);
        entries.retain(|_, entry| now - entry.timestamp < retention);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Price cache key: lowercase `name-setId-number`.
pub fn price_cache_key(name: &str, set_id: &str, number: &str) -> String {
    format!("{}-{}-{}", name, set_id, number).to_lowercase()
}

/// Image cache key: lowercase `img-name-setId-number`.
pub fn image_cache_key(name: &str, set_id: &str, number: &str) -> String {
    format!("img-{}-{}-{}", name, set_id, number).to_lowercase()
}

// ---------------------------------------------------------------------------
// On-disk JSON cache
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct DiskEnvelope<T> {
    timestamp: DateTime<Utc>,
    data: T,
}

/// A single JSON document stored under the data directory with a write timestamp.
///
/// Writes go to a temp file in the same directory and are renamed into place,
/// so an interrupted write never leaves a truncated document behind.
pub struct DiskCache {
    path: PathBuf,
    max_age: Duration,
}

impl DiskCache {
    pub fn new<P: AsRef<Path>>(dir: P, file_name: &str, max_age: Duration) -> Self {
        Self {
            path: dir.as_ref().join(file_name),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document if it exists, parses, and is younger than `max_age`.
    ///
    /// A corrupt file is removed so the next write starts clean.
    pub fn load<T: DeserializeOwned>(&self, now: DateTime<Utc>) -> Option<T> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<DiskEnvelope<T>>(&contents) {
            Ok(envelope) => {
                if now - envelope.timestamp < to_chrono(self.max_age) {
                    Some(envelope.data)
                } else {
                    log::debug!("Disk cache {} is too old", self.path.display());
                    None
                }
            }
            Err(e) => {
                log::warn!(
                    "Corrupt cache file {}: {} -- removing",
                    self.path.display(),
                    e
                );
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn store<T: Serialize>(&self, data: &T, now: DateTime<Utc>) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let envelope = DiskEnvelope {
            timestamp: now,
            data,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(&envelope)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
