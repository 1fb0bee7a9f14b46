//! In-memory memoisation of synthesized histories.
//!
//! Synthesis is pure, so a cached value is always correct for its key; the
//! TTL only bounds how long entries occupy memory. Keys round balance to
//! cents and ROI to 1e-4 percent so that values re-parsed from CSV still hit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use polywatch_core::{synthesize_with_metrics_as_of, Identity, Synthesis};

use crate::config::CacheSection;

/// Memo key for one synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identity: Identity,
    balance_cents: i64,
    roi_bp: i64,
    horizon_days: usize,
    as_of: NaiveDate,
}

impl CacheKey {
    pub fn new(
        identity: &Identity,
        current_balance: f64,
        roi_pct: f64,
        horizon_days: usize,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            identity: identity.clone(),
            balance_cents: (current_balance * 100.0).round() as i64,
            roi_bp: (roi_pct * 10_000.0).round() as i64,
            horizon_days,
            as_of,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

struct Entry {
    value: Arc<Synthesis>,
    inserted: Instant,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Thread-safe bounded TTL cache of [`Synthesis`] results.
pub struct SynthesisCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SynthesisCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(section: &CacheSection) -> Self {
        Self::new(section.ttl(), section.max_entries)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        // Entries are immutable once inserted, so a poisoned map is still valid.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached value for `key` if present and not expired.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Synthesis>> {
        let mut map = self.lock();
        let (fresh, value) = map
            .get(key)
            .map(|e| (e.inserted.elapsed() < self.ttl, Arc::clone(&e.value)))?;
        if fresh {
            Some(value)
        } else {
            map.remove(key);
            None
        }
    }

    pub fn insert(&self, key: CacheKey, value: Arc<Synthesis>) {
        let mut map = self.lock();
        if !map.contains_key(&key) && map.len() >= self.max_entries {
            if let Some(oldest) = map
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone())
            {
                tracing::trace!(identity = %oldest.identity, "evicting oldest cache entry");
                map.remove(&oldest);
            }
        }
        map.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
            },
        );
    }

    /// Return the cached synthesis, computing and storing it on a miss.
    ///
    /// The lock is not held while computing; two racing misses for the same
    /// key both compute and produce identical values.
    pub fn get_or_compute_as_of(
        &self,
        identity: &Identity,
        current_balance: f64,
        roi_pct: f64,
        horizon_days: usize,
        as_of: NaiveDate,
    ) -> Arc<Synthesis> {
        let key = CacheKey::new(identity, current_balance, roi_pct, horizon_days, as_of);
        if let Some(hit) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(identity = %identity, horizon_days, "synthesis cache miss");
        let value = Arc::new(synthesize_with_metrics_as_of(
            identity,
            current_balance,
            roi_pct,
            horizon_days,
            as_of,
        ));
        self.insert(key, Arc::clone(&value));
        value
    }

    /// [`Self::get_or_compute_as_of`] for a history ending today.
    pub fn get_or_compute(
        &self,
        identity: &Identity,
        current_balance: f64,
        roi_pct: f64,
        horizon_days: usize,
    ) -> Arc<Synthesis> {
        let today = chrono::Local::now().date_naive();
        self.get_or_compute_as_of(identity, current_balance, roi_pct, horizon_days, today)
    }

    /// Drop every entry for `identity`. Returns how many were removed.
    pub fn invalidate(&self, identity: &Identity) -> usize {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|k, _| &k.identity != identity);
        before - map.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Remove expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, e| e.inserted.elapsed() < ttl);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for SynthesisCache {
    fn default() -> Self {
        Self::from_config(&CacheSection::default())
    }
}

impl std::fmt::Debug for SynthesisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("stats", &self.stats())
            .finish()
    }
}
