//! # Feed Cache
//! Short-lived TTL cache over the fetched news table.
//!
//! Replaces framework-managed caching with an explicit object: stores
//! `(table, fetch_instant)`; a read within the TTL returns the cached copy,
//! a later read misses and forces the caller to refetch. Explicit refresh
//! invalidates immediately regardless of remaining TTL.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::model::NewsItem;

#[derive(Debug)]
pub struct FeedCache {
    inner: Mutex<Option<Snapshot>>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct Snapshot {
    items: Vec<NewsItem>,
    fetched_at: Instant,
    /// Wallclock counterpart of `fetched_at`, for "last refreshed" display.
    fetched_at_utc: DateTime<Utc>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(None),
            ttl,
        }
    }

    /// Convenience constructor matching the dashboard default (1 minute).
    pub fn new_60s() -> Self {
        Self::new(Duration::from_secs(60))
    }

    /// Return the cached table if present and fresh, else `None`.
    pub fn get(&self) -> Option<Vec<NewsItem>> {
        let guard = self.inner.lock().expect("feed cache mutex poisoned");
        match guard.as_ref() {
            Some(snap) if snap.fetched_at.elapsed() <= self.ttl => Some(snap.items.clone()),
            _ => None,
        }
    }

    /// Store a freshly fetched table, resetting the TTL clock.
    pub fn put(&self, items: Vec<NewsItem>) {
        let mut guard = self.inner.lock().expect("feed cache mutex poisoned");
        *guard = Some(Snapshot {
            items,
            fetched_at: Instant::now(),
            fetched_at_utc: Utc::now(),
        });
    }

    /// Drop the cached table so the next read is forced to refetch.
    pub fn invalidate(&self) {
        let mut guard = self.inner.lock().expect("feed cache mutex poisoned");
        *guard = None;
    }

    /// Wallclock time of the last successful fetch, if any (stale included).
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        let guard = self.inner.lock().expect("feed cache mutex poisoned");
        guard.as_ref().map(|s| s.fetched_at_utc)
    }

    /// Number of cached rows, counting a stale snapshot as absent.
    pub fn len(&self) -> usize {
        self.get().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs()
    }
}
