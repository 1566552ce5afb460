//! In-memory result store.
//!
//! Maps cache keys to memoized upstream payloads with their write timestamp.
//! The store itself does not interpret freshness; TTL policy lives in the
//! memoizer so it is enforced (and tested) in exactly one place.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;

use super::keys::CacheKey;

const SOURCE: &str = "cache::store";

/// A memoized upstream result. Opaque to the cache layer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPayload {
    pub rows: Vec<Value>,
    pub execution_time_ms: Option<f64>,
}

/// One store entry: the payload plus the instant it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub payload: QueryPayload,
    pub stored_at: OffsetDateTime,
}

/// Process-wide result store, shared by every handler through the memoizer.
///
/// A single `RwLock<HashMap>` suffices: entries are small, contention is low,
/// and the working set is the fixed handful of dashboard queries. There is no
/// size bound; entries accumulate over the process lifetime and are replaced
/// in place on refresh. That unbounded growth is an accepted limitation, not
/// a feature.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key` if present, regardless of freshness.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.read("get").get(key).cloned()
    }

    /// Inserts or overwrites the entry for `key`, unconditionally.
    pub fn put(&self, key: CacheKey, payload: QueryPayload, stored_at: OffsetDateTime) {
        self.write("put")
            .insert(key, CacheEntry { payload, stored_at });
    }

    /// Removes the entry for `key` if present; no-op otherwise.
    pub fn delete(&self, key: &CacheKey) {
        self.write("delete").remove(key);
    }

    pub fn len(&self) -> usize {
        self.read("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, op: &'static str) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    target_module = SOURCE,
                    lock_kind = "rwlock.read",
                    result = "poisoned_recovered",
                    "Recovered from poisoned result store lock"
                );
                poisoned.into_inner()
            }
        }
    }

    fn write(&self, op: &'static str) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    target_module = SOURCE,
                    lock_kind = "rwlock.write",
                    result = "poisoned_recovered",
                    "Recovered from poisoned result store lock"
                );
                poisoned.into_inner()
            }
        }
    }
}
