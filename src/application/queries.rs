//! Analytics query endpoints: memoized fetches against the query service.

use std::sync::Arc;

use time::Duration;
use tracing::info;

use crate::cache::{CacheKey, FetchMemoizer, QueryPayload};
use crate::infra::upstream::AnalyticsApi;

use super::error::QueryError;

/// The analytics-backed data endpoints, one saved query each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEndpoint {
    Depositors,
    Deposits,
}

impl DataEndpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Depositors => "depositors",
            Self::Deposits => "deposits",
        }
    }
}

/// Default query identifier per endpoint, resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct QueryDefaults {
    pub depositors: Option<String>,
    pub deposits: Option<String>,
}

impl QueryDefaults {
    fn for_endpoint(&self, endpoint: DataEndpoint) -> Option<&str> {
        match endpoint {
            DataEndpoint::Depositors => self.depositors.as_deref(),
            DataEndpoint::Deposits => self.deposits.as_deref(),
        }
    }
}

/// A resolved query result together with the identifier that produced it.
#[derive(Debug, Clone)]
pub struct QueryView {
    pub query_id: String,
    pub payload: QueryPayload,
}

/// Resolves query identifiers and serves endpoint data through the memoizer.
pub struct QueryService {
    memoizer: Arc<FetchMemoizer>,
    api: Arc<dyn AnalyticsApi>,
    defaults: QueryDefaults,
    ttl: Duration,
    credential_configured: bool,
}

impl QueryService {
    pub fn new(
        memoizer: Arc<FetchMemoizer>,
        api: Arc<dyn AnalyticsApi>,
        defaults: QueryDefaults,
        ttl: Duration,
        credential_configured: bool,
    ) -> Self {
        Self {
            memoizer,
            api,
            defaults,
            ttl,
            credential_configured,
        }
    }

    /// Fetch rows for `endpoint`, using `query_id` or the configured default.
    ///
    /// `refresh` drops the cache entry first so the next read goes upstream.
    pub async fn fetch(
        &self,
        endpoint: DataEndpoint,
        query_id: Option<String>,
        refresh: bool,
    ) -> Result<QueryView, QueryError> {
        if !self.credential_configured {
            return Err(QueryError::CredentialMissing);
        }

        let query_id = match query_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => self
                .defaults
                .for_endpoint(endpoint)
                .map(str::to_string)
                .ok_or(QueryError::MissingQueryId {
                    endpoint: endpoint.as_str(),
                })?,
        };

        let key = CacheKey::derive(endpoint.as_str(), &query_id);
        if refresh {
            info!(key = %key, "refresh requested, invalidating cache entry");
            self.memoizer.invalidate(&key);
        }

        let api = self.api.clone();
        let id = query_id.clone();
        let payload = self
            .memoizer
            .get_or_fetch(&key, self.ttl, || async move {
                api.query_rows(&id).await
            })
            .await?;

        Ok(QueryView { query_id, payload })
    }
}
