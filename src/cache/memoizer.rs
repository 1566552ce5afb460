//! TTL-based memoization of asynchronous fetches.

use std::future::Future;
use std::sync::Arc;

use metrics::counter;
use time::Duration;
use tracing::debug;

use super::clock::Clock;
use super::keys::CacheKey;
use super::store::{QueryPayload, ResultStore};

/// Memoizes asynchronous producers behind the result store.
///
/// An entry is fresh iff `now - stored_at < ttl`. Stale entries are never
/// returned to callers; they are replaced in place by the next successful
/// fetch. Producer failures are propagated unchanged and never written to
/// the store, so every call after a failure is a fresh attempt.
///
/// Concurrent callers that miss on the same key each invoke their producer
/// and the last write wins. The upstream queries are idempotent reads, so a
/// duplicate fetch during a stampede costs one redundant request at worst;
/// per-key single-flight de-duplication is a possible enhancement, not a
/// requirement.
pub struct FetchMemoizer {
    store: Arc<ResultStore>,
    clock: Arc<dyn Clock>,
}

impl FetchMemoizer {
    pub fn new(store: Arc<ResultStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the cached payload for `key` if fresh, otherwise runs
    /// `producer` and stores its result.
    ///
    /// Exactly one store mutation per successful fetch; zero on failure.
    pub async fn get_or_fetch<E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        producer: F,
    ) -> Result<QueryPayload, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<QueryPayload, E>>,
    {
        let now = self.clock.now();
        match self.store.get(key) {
            Some(entry) if now - entry.stored_at < ttl => {
                counter!("chainboard_cache_hit_total").increment(1);
                debug!(key = %key, "cache hit");
                return Ok(entry.payload);
            }
            Some(_) => {
                // Stale: do not return it, but leave it in place so a failed
                // refresh does not erase the previous result either.
                counter!("chainboard_cache_stale_total").increment(1);
                debug!(key = %key, "cache entry stale, refetching");
            }
            None => {
                counter!("chainboard_cache_miss_total").increment(1);
                debug!(key = %key, "cache miss");
            }
        }

        let payload = producer().await?;
        self.store.put(key.clone(), payload.clone(), self.clock.now());
        Ok(payload)
    }

    /// Drops the entry for `key`, forcing the next call to fetch.
    pub fn invalidate(&self, key: &CacheKey) {
        self.store.delete(key);
    }
}
