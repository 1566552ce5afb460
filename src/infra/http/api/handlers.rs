//! Data endpoint handlers: resolve parameters, call the services, wrap the
//! result in the JSON envelope.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::application::queries::DataEndpoint;

use super::ApiState;
use super::error::ApiError;
use super::models::{HealthResponse, MarketParams, QueryParams, QueryResponse};

pub async fn depositors(
    State(state): State<ApiState>,
    Query(params): Query<QueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .queries
        .fetch(DataEndpoint::Depositors, params.query_id, params.refresh)
        .await?;
    Ok(Json(QueryResponse::from_view(view, state.clock.now())))
}

pub async fn deposits(
    State(state): State<ApiState>,
    Query(params): Query<QueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .queries
        .fetch(DataEndpoint::Deposits, params.query_id, params.refresh)
        .await?;
    Ok(Json(QueryResponse::from_view(view, state.clock.now())))
}

pub async fn market(
    State(state): State<ApiState>,
    Query(params): Query<MarketParams>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.market.fetch(params.symbol, params.refresh).await?;
    Ok(Json(QueryResponse::from_view(view, state.clock.now())))
}

pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        upstream_configured: state.upstream_configured,
        timestamp: state.clock.now(),
    })
}
