//! Exchange statistics endpoint: memoized ticker lookups.

use std::sync::Arc;

use time::Duration;
use tracing::info;

use crate::cache::{CacheKey, FetchMemoizer};
use crate::infra::upstream::MarketApi;

use super::error::QueryError;
use super::queries::QueryView;

const ENDPOINT: &str = "market";

/// Serves exchange ticker statistics through the shared memoizer.
///
/// Ticker data moves faster than the analytics queries, so it carries its
/// own (shorter) TTL.
pub struct MarketService {
    memoizer: Arc<FetchMemoizer>,
    api: Arc<dyn MarketApi>,
    default_symbol: String,
    ttl: Duration,
}

impl MarketService {
    pub fn new(
        memoizer: Arc<FetchMemoizer>,
        api: Arc<dyn MarketApi>,
        default_symbol: String,
        ttl: Duration,
    ) -> Self {
        Self {
            memoizer,
            api,
            default_symbol,
            ttl,
        }
    }

    /// Fetch the 24 h ticker for `symbol` or the configured default pair.
    pub async fn fetch(
        &self,
        symbol: Option<String>,
        refresh: bool,
    ) -> Result<QueryView, QueryError> {
        let symbol = match symbol {
            // The exchange only knows uppercase pair symbols; normalizing
            // here also keeps the cache key stable across request spellings.
            Some(s) if !s.trim().is_empty() => s.trim().to_ascii_uppercase(),
            _ => self.default_symbol.clone(),
        };

        let key = CacheKey::derive(ENDPOINT, &symbol);
        if refresh {
            info!(key = %key, "refresh requested, invalidating cache entry");
            self.memoizer.invalidate(&key);
        }

        let api = self.api.clone();
        let pair = symbol.clone();
        let payload = self
            .memoizer
            .get_or_fetch(&key, self.ttl, || async move { api.ticker(&pair).await })
            .await?;

        Ok(QueryView {
            query_id: symbol,
            payload,
        })
    }
}
