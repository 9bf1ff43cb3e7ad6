//! Expiring response cache
//!
//! Entries are keyed by [`cache_key`](calorisensei_text_processing::cache_key)
//! output. An entry older than the expiry window is a miss and is evicted by
//! the read that finds it. There is no size bound; call
//! [`ResponseCache::purge_expired`] to drop stale entries that are never read
//! again.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use calorisensei_config::constants::cache::EXPIRY_SECS;

#[derive(Debug, Clone)]
struct CacheEntry {
    response: String,
    stored_at: Instant,
}

/// In-memory response cache with time-based expiry
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    expiry: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(EXPIRY_SECS))
    }
}

impl ResponseCache {
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Cached response for `key`, if stored less than `expiry` ago
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        let fresh = match entries.get(key) {
            Some(entry) => entry.stored_at.elapsed() < self.expiry,
            None => return None,
        };

        if fresh {
            entries.get(key).map(|entry| entry.response.clone())
        } else {
            entries.remove(key);
            tracing::debug!(key, "Evicted expired cache entry");
            None
        }
    }

    /// Store or overwrite `key` with the current time
    pub fn put(&self, key: impl Into<String>, response: impl Into<String>) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                response: response.into(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.expiry);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
