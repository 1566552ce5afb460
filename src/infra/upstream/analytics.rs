//! Client for the blockchain-analytics query service.
//!
//! Speaks the hosted results API: `GET /api/v1/query/{id}/results` with the
//! API key in a request header. Only the row payload and the reported
//! execution time are decoded; everything else in the response is ignored.

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cache::QueryPayload;

use super::error::UpstreamError;
use super::truncate_body;

const API_KEY_HEADER: &str = "x-dune-api-key";

/// Fetches result rows for a saved analytics query.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn query_rows(&self, query_id: &str) -> Result<QueryPayload, UpstreamError>;
}

pub struct AnalyticsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl AnalyticsClient {
    pub fn new(http: reqwest::Client, base_url: Url, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn results_url(&self, query_id: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(&format!("api/v1/query/{query_id}/results"))
            .map_err(|err| UpstreamError::Network(format!("invalid results url: {err}")))
    }
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    result: Option<ResultsBody>,
}

#[derive(Debug, Deserialize)]
struct ResultsBody {
    #[serde(default)]
    rows: Vec<Value>,
    metadata: Option<ResultsMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResultsMetadata {
    execution_time_millis: Option<f64>,
}

#[async_trait]
impl AnalyticsApi for AnalyticsClient {
    async fn query_rows(&self, query_id: &str) -> Result<QueryPayload, UpstreamError> {
        let url = self.results_url(query_id)?;
        let started = std::time::Instant::now();

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .inspect_err(|_| {
                counter!("chainboard_upstream_error_total").increment(1);
            })?;

        histogram!("chainboard_upstream_fetch_ms").record(started.elapsed().as_millis() as f64);

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            counter!("chainboard_upstream_error_total").increment(1);
            return Err(UpstreamError::NotFound {
                message: format!("query `{query_id}` has no results"),
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

        let body: ResultsResponse = response.json().await.inspect_err(|_| {
            counter!("chainboard_upstream_error_total").increment(1);
        })?;

        let result = body.result.ok_or_else(|| {
            counter!("chainboard_upstream_error_total").increment(1);
            UpstreamError::Decode("results payload is missing `result`".to_string())
        })?;

        debug!(
            query_id,
            rows = result.rows.len(),
            "fetched analytics query results"
        );

        Ok(QueryPayload {
            rows: result.rows,
            execution_time_ms: result.metadata.and_then(|m| m.execution_time_millis),
        })
    }
}
