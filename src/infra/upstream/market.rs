//! Client for the public exchange statistics API.
//!
//! Fetches the 24-hour rolling ticker for one trading pair and returns it as
//! a single-row payload, so it flows through the same memoizer and response
//! envelope as the analytics queries.

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cache::QueryPayload;

use super::error::UpstreamError;
use super::truncate_body;

/// Fetches exchange ticker statistics for a trading pair.
#[async_trait]
pub trait MarketApi: Send + Sync {
    async fn ticker(&self, symbol: &str) -> Result<QueryPayload, UpstreamError>;
}

pub struct MarketClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MarketClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn ticker_url(&self, symbol: &str) -> Result<Url, UpstreamError> {
        let mut url = self
            .base_url
            .join("api/v3/ticker/24hr")
            .map_err(|err| UpstreamError::Network(format!("invalid ticker url: {err}")))?;
        url.query_pairs_mut().append_pair("symbol", symbol);
        Ok(url)
    }
}

#[async_trait]
impl MarketApi for MarketClient {
    async fn ticker(&self, symbol: &str) -> Result<QueryPayload, UpstreamError> {
        let url = self.ticker_url(symbol)?;
        let started = std::time::Instant::now();

        let response = self.http.get(url).send().await.inspect_err(|_| {
            counter!("chainboard_upstream_error_total").increment(1);
        })?;

        histogram!("chainboard_upstream_fetch_ms").record(started.elapsed().as_millis() as f64);

        let status = response.status();
        // The exchange reports an unknown symbol as a client error.
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            counter!("chainboard_upstream_error_total").increment(1);
            return Err(UpstreamError::NotFound {
                message: format!("unknown trading pair `{symbol}`"),
            });
        }
        if !status.is_success() {
            counter!("chainboard_upstream_error_total").increment(1);
            let message = truncate_body(response.text().await.unwrap_or_default());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let ticker: Value = response.json().await.inspect_err(|_| {
            counter!("chainboard_upstream_error_total").increment(1);
        })?;

        debug!(symbol, "fetched exchange ticker");

        Ok(QueryPayload {
            rows: vec![ticker],
            execution_time_ms: None,
        })
    }
}
