use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::application::queries::QueryView;

/// Success envelope for every data endpoint.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    pub data: Vec<Value>,
    pub query_id: String,
    /// Upstream execution time in milliseconds, when the service reports one.
    pub execution_time: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl QueryResponse {
    pub fn from_view(view: QueryView, timestamp: OffsetDateTime) -> Self {
        Self {
            success: true,
            data: view.payload.rows,
            query_id: view.query_id,
            execution_time: view.payload.execution_time_ms,
            timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub upstream_configured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub query_id: Option<String>,
    /// `?refresh=true` drops the cached entry before fetching.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarketParams {
    pub symbol: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}
