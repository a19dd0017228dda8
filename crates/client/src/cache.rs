//! Read-through response cache with a wall-clock TTL.
//!
//! Entries live in a [`KeyValueStore`] as JSON strings under the
//! `itx-cache:` namespace, each carrying the epoch-millis timestamp of when
//! it was written. Expiry is checked on read; there is no background
//! eviction. Anything malformed is removed and reported as a miss, so a
//! corrupt entry heals itself on the next access.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Namespace prefix for cache keys, keeping them clear of unrelated state
/// (the cart, for one) in a shared store.
pub const CACHE_PREFIX: &str = "itx-cache:";

/// How long a cached response stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Persisted form of one cached response.
///
/// `data` is the exact decoded payload the network returned for this key;
/// `ts` is when it was stored, as milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub ts: u64,
    pub data: T,
}

/// TTL cache over a key-value store.
#[derive(Debug)]
pub struct ResponseCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> ResponseCache<S> {
    /// Wrap `store` with the given time-to-live.
    #[must_use]
    pub const fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Load a still-valid entry, or `None`.
    ///
    /// Expired and unparseable entries are removed on the way out and count
    /// as misses; neither is ever surfaced as an error.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let namespaced = Self::namespaced(key);
        let raw = self.store.get(&namespaced)?;

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(key, error = %err, "discarding unreadable cache entry");
                self.store.remove(&namespaced);
                return None;
            }
        };

        if now_millis().saturating_sub(entry.ts) > millis(self.ttl) {
            debug!(key, "cache entry expired");
            self.store.remove(&namespaced);
            return None;
        }

        Some(entry.data)
    }

    /// Store `data` under `key` with the current timestamp, replacing any
    /// previous entry. Write failures are logged and swallowed: the cache is
    /// best-effort and the caller already holds the data.
    pub fn store<T: Serialize>(&self, key: &str, data: &T) {
        let entry = CacheEntry {
            ts: now_millis(),
            data,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(err) = self.store.set(&Self::namespaced(key), &json) {
                    warn!(key, error = %err, "failed to persist cache entry");
                }
            }
            Err(err) => warn!(key, error = %err, "failed to encode cache entry"),
        }
    }

    fn namespaced(key: &str) -> String {
        format!("{CACHE_PREFIX}{key}")
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, millis)
}
